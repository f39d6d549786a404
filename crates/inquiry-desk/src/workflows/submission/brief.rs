use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use tracing::debug;

use super::domain::{field_text, Inquiry};

pub const BRIEF_HEADING: &str = "Meeting Brief";
pub const BRIEF_EXTENSION: &str = "docx";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const HEADING_STYLE: &str = "Heading1";
const UNTITLED: &str = "Untitled";

const FIELD_LABELS: [&str; 11] = [
    "Meeting Title",
    "Location",
    "Date & Time",
    "Attendees",
    "Contact Person/Phone",
    "Purpose",
    "Previous Meetings/Engagements",
    "Initiated By",
    "Agenda",
    "Background Notes",
    "Meeting Notes",
];

#[derive(Debug, thiserror::Error)]
pub enum BriefError {
    #[error("unable to render meeting brief: {0}")]
    Render(String),
    #[error("unable to write meeting brief to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("meeting brief worker failed: {0}")]
    Worker(String),
}

/// Meeting-related subset of an inquiry, held in the brief's fixed field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingBrief {
    values: [String; 11],
}

impl MeetingBrief {
    pub fn from_inquiry(inquiry: &Inquiry) -> Self {
        let values = [
            &inquiry.meeting_title,
            &inquiry.location,
            &inquiry.meeting_date_time,
            &inquiry.attendees,
            &inquiry.contact_person,
            &inquiry.meeting_purpose,
            &inquiry.previous_notes,
            &inquiry.initiated_by,
            &inquiry.agenda,
            &inquiry.background_notes,
            &inquiry.meeting_notes,
        ]
        .map(|value| field_text(value).to_string());

        Self { values }
    }

    pub fn title(&self) -> &str {
        &self.values[0]
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        FIELD_LABELS
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    /// `Label: value` lines in document order, without the heading.
    pub fn field_lines(&self) -> Vec<String> {
        self.fields()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect()
    }

    /// Heading followed by every field line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(FIELD_LABELS.len() + 1);
        lines.push(BRIEF_HEADING.to_string());
        lines.extend(self.field_lines());
        lines
    }

    /// Packs the brief as a Word document.
    pub fn render(&self) -> Result<Vec<u8>, BriefError> {
        let heading_style = Style::new(HEADING_STYLE, StyleType::Paragraph)
            .name("Heading 1")
            .size(32)
            .bold();

        let mut docx = Docx::new().add_style(heading_style).add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(BRIEF_HEADING))
                .style(HEADING_STYLE),
        );
        for line in self.field_lines() {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|err| BriefError::Render(err.to_string()))?;
        Ok(buffer.into_inner())
    }
}

/// Replaces every run of whitespace with a single underscore.
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
        } else {
            sanitized.push(ch);
            in_whitespace = false;
        }
    }
    sanitized
}

/// Path separators in the title become underscores so the brief always lands
/// directly inside the output directory.
pub fn brief_filename(title: &str, timestamp_millis: i64) -> String {
    let stem = if title.is_empty() {
        UNTITLED.to_string()
    } else {
        sanitize_title(title).replace(['/', '\\'], "_")
    };
    format!("MeetingBrief_{stem}_{timestamp_millis}.{BRIEF_EXTENSION}")
}

static LAST_TIMESTAMP: AtomicI64 = AtomicI64::new(0);

/// Epoch milliseconds, strictly increasing across the process so two briefs
/// for the same title never share a filename.
pub fn next_timestamp_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_TIMESTAMP.compare_exchange_weak(
            last,
            candidate,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}

/// A brief written to disk, ready to attach.
#[derive(Debug, Clone)]
pub struct GeneratedBrief {
    pub filename: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// Renders meeting briefs into a fixed output directory.
///
/// Files are never cleaned up; the directory accumulates one brief per
/// meeting or event submission.
#[derive(Debug, Clone)]
pub struct BriefWriter {
    output_dir: PathBuf,
}

impl BriefWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Blocking render and write.
    pub fn write(&self, brief: &MeetingBrief) -> Result<GeneratedBrief, BriefError> {
        let content = brief.render()?;
        let filename = brief_filename(brief.title(), next_timestamp_millis());
        let path = self.output_dir.join(&filename);

        fs::create_dir_all(&self.output_dir).map_err(|source| BriefError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        fs::write(&path, &content).map_err(|source| BriefError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = content.len(), "meeting brief written");
        Ok(GeneratedBrief {
            filename,
            path,
            content,
        })
    }

    /// Runs [`BriefWriter::write`] on the blocking pool.
    pub async fn write_detached(&self, brief: MeetingBrief) -> Result<GeneratedBrief, BriefError> {
        let writer = self.clone();
        tokio::task::spawn_blocking(move || writer.write(&brief))
            .await
            .map_err(|err| BriefError::Worker(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget_review() -> Inquiry {
        Inquiry {
            category: Some("Meeting Request".to_string()),
            meeting_title: Some("Budget Review".to_string()),
            location: Some("Room 4".to_string()),
            ..Inquiry::default()
        }
    }

    #[test]
    fn lines_follow_fixed_order_with_blank_defaults() {
        let brief = MeetingBrief::from_inquiry(&budget_review());
        let lines = brief.lines();

        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "Meeting Brief");
        assert_eq!(lines[1], "Meeting Title: Budget Review");
        assert_eq!(lines[2], "Location: Room 4");
        assert_eq!(lines[3], "Date & Time: ");
        assert_eq!(lines[5], "Contact Person/Phone: ");
        assert_eq!(lines[7], "Previous Meetings/Engagements: ");
        assert_eq!(lines[11], "Meeting Notes: ");
    }

    #[test]
    fn sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_title("Budget Review"), "Budget_Review");
        assert_eq!(sanitize_title("Q3  \t planning\nsync"), "Q3_planning_sync");
        assert_eq!(sanitize_title(" padded "), "_padded_");
    }

    #[test]
    fn filename_falls_back_to_untitled() {
        assert_eq!(
            brief_filename("", 1_700_000_000_000),
            "MeetingBrief_Untitled_1700000000000.docx"
        );
        assert_eq!(
            brief_filename("Budget Review", 42),
            "MeetingBrief_Budget_Review_42.docx"
        );
    }

    #[test]
    fn filename_stays_inside_output_dir() {
        assert_eq!(
            brief_filename("Q3/Q4 Planning", 7),
            "MeetingBrief_Q3_Q4_Planning_7.docx"
        );
        assert_eq!(
            brief_filename(r"Ops\Finance sync", 7),
            "MeetingBrief_Ops_Finance_sync_7.docx"
        );
    }

    #[test]
    fn writer_accepts_title_with_path_separator() {
        let dir = tempfile::tempdir().expect("temp dir");
        let writer = BriefWriter::new(dir.path());
        let brief = MeetingBrief::from_inquiry(&Inquiry {
            meeting_title: Some("Q3/Q4 Planning".to_string()),
            ..budget_review()
        });

        let generated = writer.write(&brief).expect("brief written");

        assert!(generated.filename.starts_with("MeetingBrief_Q3_Q4_Planning_"));
        assert_eq!(generated.path.parent(), Some(dir.path()));
        assert!(generated.path.is_file());
        assert_eq!(brief.lines()[1], "Meeting Title: Q3/Q4 Planning");
    }

    #[test]
    fn timestamps_strictly_increase() {
        let stamps: Vec<i64> = (0..64).map(|_| next_timestamp_millis()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn render_produces_docx_archive() {
        let bytes = MeetingBrief::from_inquiry(&budget_review())
            .render()
            .expect("brief renders");
        assert!(bytes.starts_with(b"PK"));
    }

    fn document_xml(bytes: Vec<u8>) -> String {
        use std::io::Read;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("docx is a zip archive");
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .expect("document part present")
            .read_to_string(&mut xml)
            .expect("document part is utf8");
        xml
    }

    #[test]
    fn rendered_document_holds_heading_then_fields_in_order() {
        let brief = MeetingBrief::from_inquiry(&budget_review());
        let xml = document_xml(brief.render().expect("brief renders"));

        let starts: Vec<usize> = xml
            .match_indices("<w:p")
            .map(|(index, _)| index)
            .filter(|&index| matches!(xml.as_bytes().get(index + 4), Some(b' ' | b'>')))
            .collect();
        let paragraphs: Vec<&str> = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| &xml[start..starts.get(i + 1).copied().unwrap_or(xml.len())])
            .collect();
        assert_eq!(paragraphs.len(), 12);
        assert!(paragraphs[0].contains(r#"<w:pStyle w:val="Heading1""#));
        assert!(paragraphs[0].contains("Meeting Brief"));

        for (paragraph, line) in paragraphs[1..].iter().zip(brief.field_lines()) {
            let escaped = line.replace('&', "&amp;");
            assert!(
                paragraph.contains(&escaped),
                "expected {escaped:?} in paragraph {paragraph:?}"
            );
            assert!(!paragraph.contains("Heading1"));
        }
    }
}
