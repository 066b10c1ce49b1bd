//! Binary vault file format and atomic on-disk writes.
//!
//! A vault file has this layout:
//!
//! ```text
//! [nonce: 12 bytes][password mode: 1 byte][AES-256-GCM ciphertext + 16-byte tag]
//! ```
//!
//! - **Nonce**: random per write; used both as the GCM nonce and as the
//!   Argon2id salt.
//! - **Password mode**: `1` = user-supplied passphrase, `2` = auto-generated
//!   (the nonce itself is the passphrase).
//! - **Ciphertext**: the TOML-encoded account map, authenticated as a whole.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::crypto::NONCE_LEN;
use crate::errors::{Result, TfatError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed-size header: 12 (nonce) + 1 (mode tag).
pub const HEADER_LEN: usize = NONCE_LEN + 1;

// ---------------------------------------------------------------------------
// PasswordMode
// ---------------------------------------------------------------------------

/// How the vault key is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMode {
    /// The user typed a passphrase; it is needed to unlock.
    UserSupplied,
    /// No passphrase: the key is derived from the nonce in the header, so
    /// the vault is protected by file permissions only.
    AutoGenerated,
}

impl PasswordMode {
    const USER_SUPPLIED_TAG: u8 = 1;
    const AUTO_GENERATED_TAG: u8 = 2;

    /// The byte stored in the header for this mode.
    pub fn tag(self) -> u8 {
        match self {
            Self::UserSupplied => Self::USER_SUPPLIED_TAG,
            Self::AutoGenerated => Self::AUTO_GENERATED_TAG,
        }
    }

    /// Parse a header tag byte.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            Self::USER_SUPPLIED_TAG => Ok(Self::UserSupplied),
            Self::AUTO_GENERATED_TAG => Ok(Self::AutoGenerated),
            other => Err(TfatError::InvalidVaultFormat(format!(
                "unknown password mode tag {other}"
            ))),
        }
    }

    /// Pick the mode implied by a passphrase: empty means auto-generated.
    pub fn for_passphrase(passphrase: &[u8]) -> Self {
        if passphrase.is_empty() {
            Self::AutoGenerated
        } else {
            Self::UserSupplied
        }
    }
}

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// The fixed 13-byte header at the start of every vault file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultHeader {
    pub nonce: [u8; NONCE_LEN],
    pub mode: PasswordMode,
}

impl VaultHeader {
    /// Serialize the header into its on-disk bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..NONCE_LEN].copy_from_slice(&self.nonce);
        out[NONCE_LEN] = self.mode.tag();
        out
    }

    /// Parse the header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(TfatError::InvalidVaultFormat(format!(
                "file too small to be a valid vault ({} bytes)",
                data.len()
            )));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[..NONCE_LEN]);
        let mode = PasswordMode::from_tag(data[NONCE_LEN])?;

        Ok(Self { nonce, mode })
    }
}

// ---------------------------------------------------------------------------
// Read / write
// ---------------------------------------------------------------------------

/// Raw contents of a vault file: the parsed header plus the still
/// encrypted payload.
#[derive(Debug, Clone)]
pub struct RawVault {
    pub header: VaultHeader,
    pub ciphertext: Vec<u8>,
}

impl RawVault {
    /// Concatenate header and ciphertext into the file bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        buf.extend_from_slice(&self.header.to_bytes());
        buf.extend_from_slice(&self.ciphertext);
        buf
    }
}

/// Read a vault file from disk and split it into header and payload.
pub fn read_vault(path: &Path) -> Result<RawVault> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TfatError::VaultNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(path = %path.display(), bytes = data.len(), "read vault file");

    let header = VaultHeader::parse(&data)?;
    let ciphertext = data[HEADER_LEN..].to_vec();

    Ok(RawVault { header, ciphertext })
}

/// Write a vault file to disk **atomically**.
///
/// The bytes go to a temp file in the same directory first, which is
/// then renamed over `path`.  A crash before the rename leaves the old
/// vault untouched.
pub fn write_vault(path: &Path, raw: &RawVault) -> Result<()> {
    let tmp_path = stage(path, &raw.to_bytes())?;
    commit(&tmp_path, path)
}

/// Path of the temp file used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// First half of an atomic write: create the parent directory if needed
/// and write `bytes` to the temp file with owner-only permissions.
pub fn stage(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        create_private_dir(parent)?;
    }

    let tmp_path = temp_path(path);
    let mut file = open_private(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;

    tracing::debug!(tmp = %tmp_path.display(), bytes = bytes.len(), "staged vault write");
    Ok(tmp_path)
}

/// Second half of an atomic write: rename the temp file over `path`.
pub fn commit(tmp_path: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp_path, path)?;
    tracing::debug!(path = %path.display(), "committed vault write");
    Ok(())
}

/// Open (truncating) a file readable and writable by the owner only.
fn open_private(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let file = options.open(path)?;

    // A stale temp file from an earlier crash keeps its old mode, so
    // set the permissions explicitly as well.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(file)
}

fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn header(mode: PasswordMode) -> VaultHeader {
        VaultHeader {
            nonce: [0x5A; NONCE_LEN],
            mode,
        }
    }

    #[test]
    fn header_bytes_layout() {
        let bytes = header(PasswordMode::AutoGenerated).to_bytes();
        assert_eq!(bytes.len(), 13);
        assert_eq!(&bytes[..12], &[0x5A; 12]);
        assert_eq!(bytes[12], 2);

        let bytes = header(PasswordMode::UserSupplied).to_bytes();
        assert_eq!(bytes[12], 1);
    }

    #[test]
    fn parse_rejects_unknown_mode() {
        let mut bytes = header(PasswordMode::UserSupplied).to_bytes().to_vec();
        bytes[12] = 3;
        assert!(matches!(
            VaultHeader::parse(&bytes),
            Err(TfatError::InvalidVaultFormat(_))
        ));

        bytes[12] = 0;
        assert!(VaultHeader::parse(&bytes).is_err());
    }

    #[test]
    fn parse_rejects_short_input() {
        assert!(matches!(
            VaultHeader::parse(&[0u8; 12]),
            Err(TfatError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn mode_for_passphrase() {
        assert_eq!(PasswordMode::for_passphrase(b""), PasswordMode::AutoGenerated);
        assert_eq!(PasswordMode::for_passphrase(b"x"), PasswordMode::UserSupplied);
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tfat.dat");
        let raw = RawVault {
            header: header(PasswordMode::UserSupplied),
            ciphertext: vec![1, 2, 3, 4],
        };

        write_vault(&path, &raw).unwrap();
        assert!(!temp_path(&path).exists(), "temp file must be renamed away");

        let read = read_vault(&path).unwrap();
        assert_eq!(read.header, raw.header);
        assert_eq!(read.ciphertext, vec![1, 2, 3, 4]);
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_vault(&dir.path().join("missing.dat"));
        assert!(matches!(result, Err(TfatError::VaultNotFound(_))));
    }

    #[test]
    fn read_other_io_failure_is_not_not_found() {
        // A directory exists but cannot be read as a file.
        let dir = TempDir::new().unwrap();
        let result = read_vault(dir.path());
        assert!(matches!(result, Err(TfatError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tfat.dat");
        let raw = RawVault {
            header: header(PasswordMode::AutoGenerated),
            ciphertext: vec![0; 20],
        };
        write_vault(&path, &raw).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn temp_path_is_hidden_sibling() {
        let tmp = temp_path(Path::new("/home/user/.tfat/tfat.dat"));
        assert_eq!(tmp, PathBuf::from("/home/user/.tfat/.tfat.dat.tmp"));
    }
}
