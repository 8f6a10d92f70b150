use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use gazept::{RecordedSession, replay};
use gazept_experiment::{RecorderConfig, export};
use log::info;

const USAGE: &str = "Usage: gazept <session.json> [--config <config.json>] [--out <dir>] [--csv]";

pub struct App {
    session_path: PathBuf,
    config_path: Option<PathBuf>,
    out_dir: PathBuf,
    csv: bool,
}

impl App {
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter().skip(1);
        let mut session_path = None;
        let mut config_path = None;
        let mut out_dir = PathBuf::from(".");
        let mut csv = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args.next().context("--config needs a path")?;
                    config_path = Some(PathBuf::from(value));
                }
                "--out" => {
                    out_dir = PathBuf::from(args.next().context("--out needs a directory")?);
                }
                "--csv" => csv = true,
                "-h" | "--help" => bail!("{USAGE}"),
                other if other.starts_with("--") => bail!("unknown option {other}\n{USAGE}"),
                other => {
                    if session_path.replace(PathBuf::from(other)).is_some() {
                        bail!("only one session file may be given\n{USAGE}");
                    }
                }
            }
        }

        let Some(session_path) = session_path else {
            bail!("{USAGE}");
        };

        Ok(Self {
            session_path,
            config_path,
            out_dir,
            csv,
        })
    }

    pub fn run(self) -> Result<()> {
        let config = match &self.config_path {
            Some(path) => RecorderConfig::from_json_file(path)
                .with_context(|| format!("cannot load config {}", path.display()))?,
            None => RecorderConfig::default(),
        };
        info!("Platform: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
        info!("Config: {:?}", config);

        let session = RecordedSession::from_json_file(&self.session_path)?;
        info!(
            "Replaying {} trials from {}",
            session.trials.len(),
            self.session_path.display()
        );

        let (results, summary) = replay(&session, config, &mut rand::rng())?;
        summary.log();

        let stem = self
            .session_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "session".to_string());

        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("cannot create {}", self.out_dir.display()))?;
        let json_path = self.out_dir.join(format!("{stem}_export.json"));
        export::write_json_file(&json_path, &results)?;
        info!("Results saved to {}", json_path.display());

        if self.csv {
            let (trials, logs) = export::write_csv_files(&self.out_dir, &stem, &results)?;
            info!("CSV saved to {} and {}", trials.display(), logs.display());
        }

        Ok(())
    }
}
