use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to a JSON5 config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Initial window width
    #[arg(long)]
    pub width: Option<u32>,
    /// Initial window height
    #[arg(long)]
    pub height: Option<u32>,
    /// Window title
    #[arg(long)]
    pub title: Option<String>,
    /// Draw triangle outlines only
    #[arg(long)]
    pub wireframe: bool,
    /// Exit when shaders fail to compile or link
    #[arg(long)]
    pub strict_shaders: bool,
    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Command line values win over the config file.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(title) = &self.title {
            config.window.title = title.clone();
        }
        config.wireframe |= self.wireframe;
        config.strict_shaders |= self.strict_shaders;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_keep_config() {
        let args = Args::try_parse_from(["triangles"]).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config, AppConfig::default());
        assert!(args.config.is_none());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "triangles",
            "--width",
            "1024",
            "--title",
            "two triangles",
            "--wireframe",
            "-c",
            "scene.json5",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "two triangles");
        assert!(config.wireframe);
        assert!(!config.strict_shaders);
        assert_eq!(args.config, Some(PathBuf::from("scene.json5")));
    }

    #[test]
    fn rejects_negative_size() {
        assert!(Args::try_parse_from(["triangles", "--height", "-5"]).is_err());
    }
}
