use async_trait::async_trait;
use log::debug;
use std::path::Path;
use std::process::ExitStatus;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to run encoder `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("encoder `{program}` exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Converts a downloaded image into the encoded asset format.
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), EncodeError>;
}

/// Runs an external encoder as `<program> -q <quality> <input> -o <output>`.
#[derive(Debug, Clone)]
pub struct CommandEncoder {
    program: String,
    quality: u8,
}

impl CommandEncoder {
    pub fn new(program: impl Into<String>, quality: u8) -> Self {
        Self {
            program: program.into(),
            quality,
        }
    }
}

#[async_trait]
impl Encoder for CommandEncoder {
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), EncodeError> {
        debug!(
            "Encoding {} -> {} with {} -q {}",
            input.display(),
            output.display(),
            self.program,
            self.quality
        );
        let out = Command::new(&self.program)
            .arg("-q")
            .arg(self.quality.to_string())
            .arg(input)
            .arg("-o")
            .arg(output)
            .output()
            .await
            .map_err(|source| EncodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !out.status.success() {
            return Err(EncodeError::Exit {
                program: self.program.clone(),
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
