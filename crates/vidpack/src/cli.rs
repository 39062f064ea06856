//! Command-line surface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "vidpack", version, about = "Transcode video assets behind a content-addressed cache")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Transcode a whole clip to VP9/WebM with first/last frame stills.
    Clip {
        /// Input video file.
        input: PathBuf,

        /// Playback speed multiplier (time-scales the output by 1/speed).
        #[arg(long, default_value_t = 1.0)]
        speed: f64,

        /// Use the fast/lossy encode profile instead of lossless.
        #[arg(long)]
        ultrafast: bool,

        /// Directory to write emitted assets into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Public URL prefix recorded in the module source.
        #[arg(long, env = "ASSET_PATH", default_value = "/")]
        asset_path: String,
    },

    /// Split a clip into scenes and transcode each one.
    Scenes {
        /// Input video file.
        input: PathBuf,

        /// Scene boundaries as a JSON array, e.g. '[{"end":3},{"speed":2}]'.
        #[arg(long)]
        scenes: String,

        /// Use the fast/lossy profile when VIDPACK_MODE=development.
        #[arg(long)]
        ultrafast_dev: bool,

        /// Directory to write emitted assets into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Public URL prefix recorded in the module source.
        #[arg(long, env = "ASSET_PATH", default_value = "/")]
        asset_path: String,
    },

    /// Show the cache root and its current contents.
    Cache,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_defaults() {
        let cli = Cli::parse_from(["vidpack", "clip", "in.mp4"]);
        match cli.command {
            Command::Clip {
                input,
                speed,
                ultrafast,
                out_dir,
                ..
            } => {
                assert_eq!(input, PathBuf::from("in.mp4"));
                assert!((speed - 1.0).abs() < f64::EPSILON);
                assert!(!ultrafast);
                assert_eq!(out_dir, PathBuf::from("."));
            }
            Command::Scenes { .. } | Command::Cache => panic!("expected clip"),
        }
    }

    #[test]
    fn scenes_requires_the_boundary_list() {
        assert!(Cli::try_parse_from(["vidpack", "scenes", "in.mp4"]).is_err());
        let cli = Cli::parse_from([
            "vidpack",
            "scenes",
            "in.mp4",
            "--scenes",
            r#"[{"end":3}]"#,
            "--ultrafast-dev",
        ]);
        assert!(matches!(
            cli.command,
            Command::Scenes {
                ultrafast_dev: true,
                ..
            }
        ));
    }

    #[test]
    fn cache_subcommand_parses() {
        let cli = Cli::parse_from(["vidpack", "cache"]);
        assert!(matches!(cli.command, Command::Cache));
    }
}
