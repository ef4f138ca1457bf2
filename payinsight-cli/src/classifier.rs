use payinsight_finance::{ClassifierDelegate, ClassifierError};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

/// Classifier delegate backed by an external program.
///
/// The program is run once per entry with the entry text on stdin and must
/// print the category label on stdout. This lets a model trained elsewhere
/// (e.g. `python3 predict.py model.pkl`) stand in for the keyword rules.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
}

impl CommandClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ClassifierDelegate for CommandClassifier {
    fn predict(&self, text: &str) -> Result<String, ClassifierError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClassifierError::new(format!("spawning {}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(text.as_bytes()) {
                // Program exited without reading its input; judge it by its output.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => {
                    return Err(ClassifierError::new(format!(
                        "writing to {}: {e}",
                        self.program
                    )));
                }
                Ok(()) => {}
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| ClassifierError::new(format!("waiting for {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClassifierError::new(format!(
                "{} exited with {}. stderr: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let label = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if label.is_empty() {
            return Err(ClassifierError::new(format!(
                "{} printed no label",
                self.program
            )));
        }
        Ok(label)
    }
}
