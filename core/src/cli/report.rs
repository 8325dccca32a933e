use crate::decode::FundusHeader;
use crate::export::BatchReport;
use crate::types::MetadataRecord;
use std::fmt;

/// Text report formatter for a dump's metadata record
pub struct TextReport<'a> {
    metadata: &'a MetadataRecord,
    fundus: Option<&'a [FundusHeader]>,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(metadata: &'a MetadataRecord) -> Self {
        Self {
            metadata,
            fundus: None,
        }
    }

    /// Adds the fundus image directory to the report
    pub fn with_fundus(mut self, headers: &'a [FundusHeader]) -> Self {
        self.fundus = Some(headers);
        self
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.metadata;
        let p = &m.patient;

        writeln!(f, "Image Settings")?;
        writeln!(f, "==============")?;
        writeln!(f)?;
        writeln!(f, "Resolution:     {}x{}", m.width, m.height)?;
        writeln!(f, "Frames:         {}", m.frame_count)?;
        writeln!(f, "Bytes/Pixel:    {}", m.bytes_per_pixel)?;
        writeln!(f, "Frame Size:     {} bytes", m.frame_byte_size)?;
        writeln!(f, "X mm/Pixel:     {}", m.x_mm_per_pixel)?;
        writeln!(f, "Y mm/Pixel:     {}", m.y_mm_per_pixel)?;
        writeln!(f, "Z mm/Pixel:     {}", m.z_mm_per_pixel)?;
        writeln!(f, "Exam Date:      {}", m.examination_date)?;
        writeln!(f, "Exam Time:      {}", m.examination_time)?;
        writeln!(f)?;

        writeln!(f, "Patient")?;
        writeln!(f, "-------")?;
        writeln!(f, "ID:             {}", p.id)?;
        writeln!(f, "Name:           {} {}", p.first_name, p.last_name)?;
        writeln!(f, "Birthday:       {}", p.birthday)?;
        writeln!(f, "Eye:            {}", p.eye)?;
        writeln!(f, "Comment:        {}", p.commentary)?;
        writeln!(f)?;

        writeln!(f, "Layout")?;
        writeln!(f, "------")?;
        writeln!(f, "Volume File:    {}", m.volume_file_name)?;
        writeln!(f, "Volume Offset:  {}", m.volume_offset)?;
        writeln!(f, "Fundus File:    {}", m.fundus_file_name)?;
        writeln!(f, "Fundus Offset:  {}", m.fundus_offset)?;

        if let Some(headers) = self.fundus {
            writeln!(f)?;
            writeln!(f, "Fundus Images:  {}", headers.len())?;
            for (i, header) in headers.iter().enumerate() {
                writeln!(f, "  [{}] {}x{}", i, header.width, header.height)?;
            }
        }

        Ok(())
    }
}

/// Per-file outcome table of an export run
pub struct BatchSummary<'a> {
    report: &'a BatchReport,
}

impl<'a> BatchSummary<'a> {
    pub fn new(report: &'a BatchReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for BatchSummary<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Export Summary")?;
        writeln!(f, "==============")?;
        writeln!(f)?;

        for file in &self.report.files {
            writeln!(f, "{}", file.path.display())?;
            writeln!(f, "  Frames:   {}", file.frames_written)?;
            writeln!(f, "  Fundus:   {}", file.fundus_written)?;
            writeln!(
                f,
                "  Metadata: {}",
                if file.metadata_written { "yes" } else { "no" }
            )?;
            if let Some(error) = &file.error {
                writeln!(f, "  Failed:   {}", error)?;
            }
        }

        writeln!(f)?;
        write!(
            f,
            "{} files, {} failed",
            self.report.files.len(),
            self.report.failed_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::FileReport;
    use crate::testutil::record_with;
    use std::path::PathBuf;

    #[test]
    fn test_text_report_format() {
        let metadata = record_with(512, 256, 2, 128, 4096);

        let output = format!("{}", TextReport::new(&metadata));

        assert!(output.contains("Image Settings"));
        assert!(output.contains("Resolution:     512x256"));
        assert!(output.contains("Frames:         128"));
        assert!(output.contains("Bytes/Pixel:    2"));
        assert!(output.contains("Frame Size:     262144 bytes"));
        assert!(output.contains("Name:           Zoë Muster"));
        assert!(output.contains("Volume Offset:  4096"));
        assert!(!output.contains("Fundus Images"));
    }

    #[test]
    fn test_text_report_with_fundus() {
        let metadata = record_with(4, 3, 1, 1, 0);
        let headers = [
            FundusHeader {
                width: 768,
                height: 576,
            },
            FundusHeader {
                width: 32,
                height: 16,
            },
        ];

        let output = TextReport::new(&metadata).with_fundus(&headers).to_string();

        assert!(output.contains("Fundus Images:  2"));
        assert!(output.contains("  [0] 768x576"));
        assert!(output.contains("  [1] 32x16"));
    }

    #[test]
    fn test_batch_summary() {
        let report = BatchReport {
            files: vec![
                FileReport {
                    path: PathBuf::from("a.oct"),
                    frames_written: 128,
                    fundus_written: 1,
                    metadata_written: true,
                    error: None,
                },
                FileReport {
                    path: PathBuf::from("b.oct"),
                    error: Some("Tag not found: WIDTH:".to_string()),
                    ..Default::default()
                },
            ],
        };

        let output = BatchSummary::new(&report).to_string();

        assert!(output.contains("  Frames:   128"));
        assert!(output.contains("  Failed:   Tag not found: WIDTH:"));
        assert!(output.ends_with("2 files, 1 failed"));
    }
}
