use crate::datetime::DateTime;
use crate::errors::EpubError;
use crate::writer::WriterResult;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime as ZipDateTime};

pub(crate) trait ZipFileOptionsExt {
    fn zip_compression_level(self, level: u8) -> Self;

    fn zip_last_modified_date(self, date: DateTime) -> Self;
}

impl ZipFileOptionsExt for SimpleFileOptions {
    fn zip_compression_level(self, level: u8) -> Self {
        if level == 0 {
            self.compression_method(CompressionMethod::Stored)
                .compression_level(None)
        } else {
            self.compression_method(CompressionMethod::Deflated)
                .compression_level(Some(level as i64))
        }
    }

    fn zip_last_modified_date(self, datetime: DateTime) -> Self {
        // DOS timestamps cannot represent years before 1980
        let datetime = ZipDateTime::from_date_and_time(
            datetime.year(),
            datetime.month(),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second(),
        )
        .unwrap_or_default();

        self.last_modified_time(datetime)
    }
}

pub(crate) struct ZipWriter<W: Write + Seek> {
    inner: zip::ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ZipWriter<W> {
    pub(crate) fn new(writer: W, options: SimpleFileOptions) -> Self {
        Self {
            inner: zip::ZipWriter::new(writer),
            options,
        }
    }

    fn start_zip_file_entry(&mut self, name: &str, options: SimpleFileOptions) -> WriterResult<()> {
        log::trace!("zip entry: {name}");

        self.inner
            // Strip leading '/' to avoid absolute paths in the archive.
            .start_file(name.trim_start_matches('/'), options)
            .map_err(from_zip_error)
    }

    /// Starts an entry that is always stored, regardless of the compression level.
    pub(crate) fn start_uncompressed_file(&mut self, name: &str) -> WriterResult<()> {
        self.start_zip_file_entry(
            name,
            // A compression level on a stored entry is rejected by `zip`
            self.options
                .compression_method(CompressionMethod::Stored)
                .compression_level(None),
        )
    }

    pub(crate) fn start_file(&mut self, name: &str) -> WriterResult<()> {
        self.start_zip_file_entry(name, self.options)
    }

    /// Convenience for [`Self::start_file`] followed by writing `data`.
    pub(crate) fn write_file(&mut self, name: &str, data: &[u8]) -> WriterResult<()> {
        self.start_file(name)?;
        self.inner.write_all(data)?;
        Ok(())
    }

    pub(crate) fn finish(self) -> WriterResult<W> {
        self.inner.finish().map_err(from_zip_error)
    }
}

impl<W: Write + Seek> Write for ZipWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn from_zip_error(error: zip::result::ZipError) -> EpubError {
    EpubError::Io(match error {
        zip::result::ZipError::Io(error) => error,
        error => std::io::Error::other(error),
    })
}
