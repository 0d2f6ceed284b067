use std::{fs::File, path::Path};

use csv::{Writer, WriterBuilder};

use super::records::TimingRecord;

/// Creates the trial log and writes its header row.
pub fn create_writer(path: &Path) -> Result<Writer<File>, csv::Error> {
    let f = File::create(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::prelude::PermissionsExt;

        let mut permissions = f.metadata()?.permissions();
        permissions.set_mode(0o664);
        f.set_permissions(permissions)?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(f);
    writer.write_record(TimingRecord::HEADER)?;
    writer.flush()?;

    Ok(writer)
}
