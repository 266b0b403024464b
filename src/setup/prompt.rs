//! Interactive config creation

use std::io::{self, BufRead, Write};

use crate::config::{decide_config_creation, BkpPaths, Config, ConfigAction};
use crate::error::{BkpError, BkpResult};

/// Asks for config values over any reader/writer pair
pub struct ConfigPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConfigPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Load the config, offering to create it when it is missing
    ///
    /// Declining leaves the filesystem untouched and returns `ConfigMissing`.
    pub fn ensure(&mut self, paths: &BkpPaths) -> BkpResult<Config> {
        match Config::load(paths) {
            Err(BkpError::ConfigMissing(path)) => self.create(paths, path),
            other => other,
        }
    }

    fn create(&mut self, paths: &BkpPaths, path: std::path::PathBuf) -> BkpResult<Config> {
        writeln!(self.output, "Config file {} does not exist.", path.display())?;
        let answer = self.prompt_string(&format!(
            "Okay to create a new config file in {}? (yes/no) [yes]: ",
            path.display()
        ))?;

        match decide_config_creation(is_yes(&answer)) {
            ConfigAction::Exit => {
                writeln!(self.output, "Will exit this program now.")?;
                Err(BkpError::ConfigMissing(path))
            }
            ConfigAction::Create => {
                let bucket = self.prompt_string("S3 Bucket name> ")?;
                let prefix = self.prompt_string("S3 Bucket path> ")?;
                let config = Config::new(bucket, prefix);
                config.save(paths)?;
                tracing::info!(path = %path.display(), "created config file");
                writeln!(self.output, "Created config file {}", path.display())?;
                Ok(config)
            }
        }
    }

    fn prompt_string(&mut self, prompt: &str) -> BkpResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut input = String::new();
        self.input.read_line(&mut input)?;

        Ok(input.trim().to_string())
    }
}

/// Load the config, prompting on the terminal when it is missing
pub fn ensure_config(paths: &BkpPaths) -> BkpResult<Config> {
    let stdin = io::stdin();
    ConfigPrompt::new(stdin.lock(), io::stdout()).ensure(paths)
}

/// Empty input takes the `[yes]` default
fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "" | "y" | "yes")
}
