use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_INTERPRETER: &str = "python";
pub const DEFAULT_MODULE: &str = "esptool";
pub const BAUD: u32 = 921_600;
pub const FLASH_OFFSET: u32 = 0x41_0000;
pub const DEFAULT_IMAGE: &str = "fatfs.bin";

/// Parameters of the esptool `write_flash` command line. Baud rate and
/// flash offset are not part of it: they are always [`BAUD`] and
/// [`FLASH_OFFSET`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashTemplate {
    pub interpreter: String,
    pub module: String,
    pub image: PathBuf,
}

impl Default for FlashTemplate {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            module: DEFAULT_MODULE.to_string(),
            image: PathBuf::from(DEFAULT_IMAGE),
        }
    }
}

impl FlashTemplate {
    pub fn image(&self) -> &Path {
        &self.image
    }

    pub fn command_for(&self, port: &str) -> CommandInvocation {
        let args = vec![
            self.interpreter.clone(),
            "-m".to_string(),
            self.module.clone(),
            "--port".to_string(),
            port.to_string(),
            "--baud".to_string(),
            BAUD.to_string(),
            "write_flash".to_string(),
            format!("{:#x}", FLASH_OFFSET),
            self.image.display().to_string(),
        ];
        CommandInvocation { args }
    }
}

/// A fully assembled command line: program followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cmd = FlashTemplate::default().command_for("COM3");
        assert_eq!(
            cmd.as_slice(),
            [
                "python",
                "-m",
                "esptool",
                "--port",
                "COM3",
                "--baud",
                "921600",
                "write_flash",
                "0x410000",
                "fatfs.bin"
            ]
        );
        assert_eq!(cmd.program(), "python");
        assert_eq!(cmd.args().len(), 9);
        assert_eq!(
            cmd.to_string(),
            "python -m esptool --port COM3 --baud 921600 write_flash 0x410000 fatfs.bin"
        );
    }

    #[test]
    fn test_baud_and_offset_fixed_across_ports() {
        let template = FlashTemplate::default();
        for port in ["COM1", "/dev/ttyUSB0", "/dev/cu.usbmodem1101"] {
            let cmd = template.command_for(port);
            assert_eq!(cmd.as_slice()[6], "921600");
            assert_eq!(cmd.as_slice()[8], "0x410000");
            assert_eq!(cmd.as_slice()[4], port);
        }
    }

    #[test]
    fn test_empty_invocation() {
        let cmd = CommandInvocation::new(vec![]);
        assert_eq!(cmd.program(), "");
        assert!(cmd.args().is_empty());
    }
}
