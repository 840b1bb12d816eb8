use camino::Utf8PathBuf;
use clap::Parser;

/// Compiler and language server for `.xcs` files.
#[derive(Debug, Parser)]
#[command(name = "xcsls", version, about)]
pub struct Cli {
    /// Run as a language server over stdio instead of a one-shot build.
    #[arg(long)]
    pub lsp: bool,

    /// Workspace root. Must exist.
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Run the in-memory self-test and exit.
    #[arg(long)]
    pub dev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["xcsls"]).unwrap();
        assert!(!cli.lsp);
        assert!(!cli.dev);
        assert_eq!(cli.workspace, Utf8PathBuf::from("."));
    }

    #[test]
    fn test_lsp_with_workspace() {
        let cli = Cli::try_parse_from(["xcsls", "--lsp", "--workspace", "/proj"]).unwrap();
        assert!(cli.lsp);
        assert_eq!(cli.workspace, Utf8PathBuf::from("/proj"));
    }

    #[test]
    fn test_dev_flag() {
        let cli = Cli::try_parse_from(["xcsls", "--dev"]).unwrap();
        assert!(cli.dev);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["xcsls", "--bogus"]).is_err());
    }
}
