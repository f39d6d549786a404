use clap::Args;
use inquiry_desk::config::AppConfig;
use inquiry_desk::error::AppError;
use inquiry_desk::workflows::submission::{
    BriefWriter, Classification, Inquiry, MeetingBrief, RoutingTable,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ClassifyArgs {
    /// Inquiry category exactly as the form submits it
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Optional sub-category (e.g. Centrelink)
    #[arg(long)]
    pub(crate) sub_category: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct BriefArgs {
    /// Meeting title; also used in the generated filename
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Free-text date and time
    #[arg(long)]
    pub(crate) date_time: Option<String>,
    #[arg(long)]
    pub(crate) attendees: Option<String>,
    #[arg(long)]
    pub(crate) contact_person: Option<String>,
    #[arg(long)]
    pub(crate) purpose: Option<String>,
    #[arg(long)]
    pub(crate) previous_notes: Option<String>,
    #[arg(long)]
    pub(crate) initiated_by: Option<String>,
    #[arg(long)]
    pub(crate) agenda: Option<String>,
    #[arg(long)]
    pub(crate) background_notes: Option<String>,
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Directory for the brief (defaults to DOCUMENT_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

impl BriefArgs {
    fn inquiry(&self) -> Inquiry {
        Inquiry {
            category: Some("Meeting Request".to_string()),
            meeting_title: self.title.clone(),
            location: self.location.clone(),
            meeting_date_time: self.date_time.clone(),
            attendees: self.attendees.clone(),
            contact_person: self.contact_person.clone(),
            meeting_purpose: self.purpose.clone(),
            previous_notes: self.previous_notes.clone(),
            initiated_by: self.initiated_by.clone(),
            agenda: self.agenda.clone(),
            background_notes: self.background_notes.clone(),
            meeting_notes: self.notes.clone(),
            ..Inquiry::default()
        }
    }
}

pub(crate) fn run_routes() -> Result<(), AppError> {
    println!("Email routing rules");
    for (category, subject) in RoutingTable::with_defaults().snapshot() {
        println!("- {category} -> {subject}");
    }
    println!("(any other category) -> General Inquiry");
    Ok(())
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let Classification {
        subject,
        needs_document,
    } = classify(args);

    println!("Subject: {subject}");
    println!(
        "Meeting brief: {}",
        if needs_document { "attached" } else { "none" }
    );
    Ok(())
}

fn classify(args: ClassifyArgs) -> Classification {
    let inquiry = Inquiry {
        category: args.category,
        sub_category: args.sub_category,
        ..Inquiry::default()
    };
    RoutingTable::with_defaults().classify(&inquiry)
}

pub(crate) fn run_brief(args: BriefArgs) -> Result<(), AppError> {
    let output_dir = match args.output_dir.clone() {
        Some(dir) => dir,
        None => AppConfig::load()?.documents.output_dir,
    };

    let brief = MeetingBrief::from_inquiry(&args.inquiry());
    let generated = BriefWriter::new(output_dir).write(&brief)?;

    for line in brief.lines() {
        println!("{line}");
    }
    println!("\nWritten to {}", generated.path.display());
    Ok(())
}
