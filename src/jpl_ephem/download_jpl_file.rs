use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use std::{fmt, str::FromStr};

use crate::porkchop_errors::PorkchopError;

use super::naif::naif_version::NaifVersion;

/// Where the planetary ephemeris comes from.
///
/// Parsed from a short descriptor string:
/// * `"analytic"`: mean orbital elements, nothing to load,
/// * `"naif:DE440"`: a JPL DE kernel looked up in (or downloaded to) the user cache directory,
/// * `"file:/path/to/kernel.bsp"` or any path ending with `.bsp`: an explicit kernel file.
#[derive(Debug, Clone, PartialEq)]
pub enum EphemFileSource {
    Analytic,
    Naif(NaifVersion),
    File(Utf8PathBuf),
}

impl FromStr for EphemFileSource {
    type Err = PorkchopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("analytic") {
            return Ok(EphemFileSource::Analytic);
        }
        if let Some(version) = s.strip_prefix("naif:") {
            let version = version
                .parse::<NaifVersion>()
                .map_err(PorkchopError::InvalidJPLEphemFileVersion)?;
            return Ok(EphemFileSource::Naif(version));
        }
        if let Some(path) = s.strip_prefix("file:") {
            return Ok(EphemFileSource::File(Utf8PathBuf::from(path)));
        }
        if s.ends_with(".bsp") {
            return Ok(EphemFileSource::File(Utf8PathBuf::from(s)));
        }
        Err(PorkchopError::InvalidJPLStringFormat(format!(
            "{s} (expected 'analytic', 'naif:<version>', 'file:<path>' or a .bsp path)"
        )))
    }
}

impl TryFrom<&str> for EphemFileSource {
    type Error = PorkchopError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::Analytic => write!(f, "analytic"),
            EphemFileSource::Naif(version) => write!(f, "naif:{version}"),
            EphemFileSource::File(path) => write!(f, "file:{path}"),
        }
    }
}

/// Directory where downloaded kernels are kept: `<user cache>/porkchop_cache/jpl_ephem`.
pub fn kernel_cache_dir() -> Result<Utf8PathBuf, PorkchopError> {
    let base_dir = BaseDirs::new().ok_or_else(|| {
        PorkchopError::UnableToCreateBaseDir("no home directory for this user".into())
    })?;
    let cache_path = Utf8Path::from_path(base_dir.cache_dir())
        .ok_or_else(|| PorkchopError::Utf8PathError(format!("{:?}", base_dir.cache_dir())))?;
    Ok(cache_path.join("porkchop_cache").join("jpl_ephem"))
}

/// Download a large file from a URL
/// Uses reqwest to download the file in chunks
/// and saves it to the specified path using tokio's async file I/O
/// and stream processing.
///
/// Arguments
/// ---------
/// * `url`: the URL of the file to download
/// * `path`: the path to save the downloaded file
#[cfg(feature = "jpl-download")]
async fn download_big_file(url: &str, path: &Utf8Path) -> Result<(), PorkchopError> {
    use tokio::{fs::File, io::AsyncWriteExt};
    use tokio_stream::StreamExt;

    let partial = path.with_extension("part");
    let mut file = File::create(&partial).await?;
    tracing::info!(url, "downloading JPL kernel");

    let mut stream = reqwest::get(url).await?.error_for_status()?.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    tokio::fs::rename(&partial, path).await?;

    tracing::info!(%path, "downloaded JPL kernel");
    Ok(())
}

/// Resolve the kernel file of a NAIF/file source on disk.
///
/// Arguments
/// ---------
/// * `source`: the ephemeris source, must not be [`EphemFileSource::Analytic`]
///
/// Return
/// ------
/// * The path of an existing kernel file. With the `jpl-download` feature, a missing DE
///   kernel is downloaded from the NAIF server into [`kernel_cache_dir`] first.
pub fn get_ephemeris_file(source: &EphemFileSource) -> Result<Utf8PathBuf, PorkchopError> {
    match source {
        EphemFileSource::Analytic => Err(PorkchopError::InvalidJPLEphemFileSource(
            "the analytic ephemeris has no kernel file".into(),
        )),
        EphemFileSource::File(path) => {
            if path.exists() {
                Ok(path.clone())
            } else {
                Err(PorkchopError::JPLFileNotFound(path.to_string()))
            }
        }
        EphemFileSource::Naif(version) => {
            let cache_path = kernel_cache_dir()?;
            let local_file = cache_path.join(version.get_filename());

            if local_file.exists() {
                return Ok(local_file);
            }

            #[cfg(feature = "jpl-download")]
            {
                std::fs::create_dir_all(&cache_path)?;
                let url = format!(
                    "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/{}",
                    version.get_filename()
                );

                let rt = tokio::runtime::Runtime::new()?;
                rt.block_on(download_big_file(&url, &local_file))?;

                Ok(local_file)
            }

            #[cfg(not(feature = "jpl-download"))]
            {
                Err(PorkchopError::JPLFileNotFound(format!(
                    "{local_file} (download feature is disabled)"
                )))
            }
        }
    }
}

#[cfg(test)]
mod jpl_source_test {
    use super::*;

    #[test]
    fn test_parse_sources() {
        assert_eq!(
            "analytic".parse::<EphemFileSource>().unwrap(),
            EphemFileSource::Analytic
        );
        assert_eq!(
            "naif:DE440".parse::<EphemFileSource>().unwrap(),
            EphemFileSource::Naif(NaifVersion::DE440)
        );
        assert_eq!(
            "/data/de430.bsp".parse::<EphemFileSource>().unwrap(),
            EphemFileSource::File("/data/de430.bsp".into())
        );
        assert_eq!(
            "file:kernels/custom".parse::<EphemFileSource>().unwrap(),
            EphemFileSource::File("kernels/custom".into())
        );
        assert!(matches!(
            "naif:DE999".parse::<EphemFileSource>(),
            Err(PorkchopError::InvalidJPLEphemFileVersion(_))
        ));
        assert!(matches!(
            "horizon:DE440".parse::<EphemFileSource>(),
            Err(PorkchopError::InvalidJPLStringFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let source = EphemFileSource::File("does/not/exist.bsp".into());
        assert_eq!(
            get_ephemeris_file(&source),
            Err(PorkchopError::JPLFileNotFound("does/not/exist.bsp".into()))
        );
    }

    #[test]
    #[cfg(not(feature = "jpl-download"))]
    fn test_no_feature_download_jpl_ephem() {
        let source = EphemFileSource::Naif(NaifVersion::DE442);
        let cached = kernel_cache_dir()
            .map(|dir| dir.join("de442.bsp").exists())
            .unwrap_or(false);
        if !cached {
            assert!(get_ephemeris_file(&source).is_err());
        }
    }
}
