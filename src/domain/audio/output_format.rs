//! Output container format

use std::fmt;
use std::str::FromStr;

use crate::domain::error::UnsupportedFormatError;

/// Container/codec the mixed recording is saved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Uncompressed mono 16-bit PCM
    #[default]
    Wav,
    /// MP3, transcoded from an in-memory WAV
    Mp3,
}

/// Outcome of resolving a user-supplied format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFormat {
    pub format: OutputFormat,
    /// Set when the request was not recognized and WAV was substituted
    pub warning: Option<UnsupportedFormatError>,
}

impl OutputFormat {
    /// All formats, in menu order
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Wav, OutputFormat::Mp3];

    /// Get the format name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Resolve a requested format, falling back to WAV for anything unknown
    pub fn resolve(requested: &str) -> ResolvedFormat {
        match requested.parse::<Self>() {
            Ok(format) => ResolvedFormat {
                format,
                warning: None,
            },
            Err(warning) => ResolvedFormat {
                format: Self::default(),
                warning: Some(warning),
            },
        }
    }
}

impl FromStr for OutputFormat {
    type Err = UnsupportedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            _ => Err(UnsupportedFormatError {
                requested: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_formats_case_insensitive() {
        assert_eq!("wav".parse::<OutputFormat>().unwrap(), OutputFormat::Wav);
        assert_eq!("MP3".parse::<OutputFormat>().unwrap(), OutputFormat::Mp3);
        assert_eq!(" Wav ".parse::<OutputFormat>().unwrap(), OutputFormat::Wav);
    }

    #[test]
    fn parse_unknown_format_fails() {
        let err = "flac".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.requested, "flac");
    }

    #[test]
    fn resolve_known_format_has_no_warning() {
        let resolved = OutputFormat::resolve("mp3");
        assert_eq!(resolved.format, OutputFormat::Mp3);
        assert!(resolved.warning.is_none());
    }

    #[test]
    fn resolve_unknown_format_falls_back_to_wav() {
        let resolved = OutputFormat::resolve("xyz");
        assert_eq!(resolved.format, OutputFormat::Wav);
        let warning = resolved.warning.unwrap();
        assert_eq!(warning.requested, "xyz");
        assert!(warning.to_string().contains("WAV"));
    }

    #[test]
    fn default_is_wav() {
        assert_eq!(OutputFormat::default(), OutputFormat::Wav);
    }

    #[test]
    fn extension_matches_name() {
        for format in OutputFormat::ALL {
            assert_eq!(format.extension(), format.to_string());
        }
    }
}
