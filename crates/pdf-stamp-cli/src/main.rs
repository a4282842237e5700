mod logger;

use anyhow::{Context, Result, anyhow, bail, ensure};
use clap::{ArgAction, Args, Parser, Subcommand};
use pdf_stamp::validate::{
    validate_document_file, validate_position, validate_recipient_name, validate_signature_file,
};
use pdf_stamp::{DocumentTemplate, Position, PositionTemplateStore, Recipient, StampOptions};
use pdf_stamp_runtime::{BatchSummary, StampCommand, StampUpdate, StampWorker};
use std::path::PathBuf;

use crate::logger::StderrLogger;

#[derive(Parser)]
#[command(name = "pdfsig", about = "Stamp signature images onto PDF templates", version)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count and page sizes of a template
    Inspect {
        /// Template PDF
        template: PathBuf,
    },

    /// Stamp one recipient's signature onto a template
    Stamp {
        /// Template PDF
        #[arg(short, long)]
        template: PathBuf,

        /// Signature image (png, jpg, jpeg)
        #[arg(short, long)]
        signature: PathBuf,

        /// Recipient name, used in the output file name
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        placement: PlacementArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Stamp every recipient listed in a CSV file
    Batch {
        /// Template PDF
        #[arg(short, long)]
        template: PathBuf,

        /// Recipient CSV (columns: name, title, signature_path)
        #[arg(short, long)]
        recipients: PathBuf,

        #[command(flatten)]
        placement: PlacementArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Resize a signature image and save it as PNG
    Resize {
        /// Signature image (png, jpg, jpeg)
        #[arg(short, long)]
        signature: PathBuf,

        /// Target width in pixels
        #[arg(long)]
        width: u32,

        /// Target height in pixels
        #[arg(long)]
        height: u32,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Manage saved signature positions
    Positions {
        #[command(subcommand)]
        action: PositionsAction,
    },
}

#[derive(Subcommand)]
enum PositionsAction {
    /// List saved positions
    List {
        /// Position store (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Save or replace a named position
    Save {
        /// Position store (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Position name
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        coordinates: CoordinateArgs,
    },

    /// Remove a named position
    Remove {
        /// Position store (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Position name
        #[arg(short, long)]
        name: String,
    },
}

/// Signature box in points, origin at the page's top-left corner
#[derive(Args)]
struct CoordinateArgs {
    /// Distance from the left edge
    #[arg(long, default_value = "0")]
    x: f32,

    /// Distance from the top edge
    #[arg(long, default_value = "0")]
    y: f32,

    /// Box width
    #[arg(long, default_value = "150")]
    width: f32,

    /// Box height
    #[arg(long, default_value = "50")]
    height: f32,

    /// Zero-based page index
    #[arg(long, default_value = "0")]
    page: usize,
}

impl From<&CoordinateArgs> for Position {
    fn from(args: &CoordinateArgs) -> Self {
        Position {
            x: args.x,
            y: args.y,
            width: args.width,
            height: args.height,
            page: args.page,
        }
    }
}

#[derive(Args)]
struct PlacementArgs {
    #[command(flatten)]
    coordinates: CoordinateArgs,

    /// Position store (JSON) to read a saved position from
    #[arg(long, requires = "position_name")]
    position_file: Option<PathBuf>,

    /// Saved position to use instead of the coordinates
    #[arg(long, requires = "position_file")]
    position_name: Option<String>,
}

impl PlacementArgs {
    async fn resolve(&self) -> Result<Position> {
        match (&self.position_file, &self.position_name) {
            (Some(file), Some(name)) => {
                let store = PositionTemplateStore::load(file).await?;
                store
                    .get(name)
                    .copied()
                    .ok_or_else(|| anyhow!("No saved position named '{}' in {}", name, file.display()))
            }
            _ => Ok(Position::from(&self.coordinates)),
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Directory for stamped documents
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Options file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replace existing output files instead of numbering new ones
    #[arg(long)]
    overwrite: bool,
}

impl OutputArgs {
    async fn options(&self) -> Result<StampOptions> {
        let mut options = match &self.config {
            Some(path) => StampOptions::load(path)
                .await
                .with_context(|| format!("Failed to load options from {}", path.display()))?,
            None => StampOptions::default(),
        };
        if let Some(dir) = &self.output_dir {
            options.output_dir = dir.clone();
        }
        options.overwrite |= self.overwrite;
        options.validate()?;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::from_verbosity(cli.verbose).init()?;

    match cli.command {
        Commands::Inspect { template } => {
            validate_document_file(&template)?;
            let template = DocumentTemplate::load(&template).await?;
            println!("Template: {}", template.base_name());
            println!("  Pages: {}", template.page_count());
            for (index, page) in template.pages().iter().enumerate() {
                println!("  [{}] {} x {} pt", index, page.width, page.height);
            }
        }

        Commands::Stamp {
            template,
            signature,
            name,
            placement,
            output,
        } => {
            validate_document_file(&template)?;
            validate_signature_file(&signature)?;
            validate_recipient_name(&name)?;
            let position = placement.resolve().await?;
            let options = output.options().await?;

            let recipient = Recipient::new(name.trim(), signature);
            let path = pdf_stamp::stamp_file(&template, recipient, position, options).await?;
            println!("Stamped {} → {}", name.trim(), path.display());
        }

        Commands::Batch {
            template,
            recipients,
            placement,
            output,
        } => {
            validate_document_file(&template)?;
            let position = placement.resolve().await?;
            let options = output.options().await?;
            let summary = run_batch(template, recipients, position, options).await?;

            println!(
                "Summary: {} succeeded, {} failed (of {})",
                summary.succeeded.len(),
                summary.failed.len(),
                summary.total
            );
            for (name, reason) in &summary.failed {
                println!("  {}: {}", name, reason);
            }
            if !summary.all_succeeded() {
                bail!("{} of {} recipient(s) failed", summary.failed.len(), summary.total);
            }
        }

        Commands::Resize {
            signature,
            width,
            height,
            output,
        } => {
            validate_signature_file(&signature)?;
            let image = pdf_stamp::load_signature(&signature)?;
            let resized = pdf_stamp::resize(&image, width, height)?;
            let bytes = pdf_stamp::encode_png(&resized)?;
            tokio::fs::write(&output, bytes)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Resized {}x{} → {}x{} → {}",
                image.width(),
                image.height(),
                width,
                height,
                output.display()
            );
        }

        Commands::Positions { action } => run_positions(action).await?,
    }

    Ok(())
}

/// Drive a batch through the background worker, echoing progress as it arrives.
async fn run_batch(
    template: PathBuf,
    recipients_csv: PathBuf,
    position: Position,
    options: StampOptions,
) -> Result<BatchSummary> {
    let (worker, mut updates) = StampWorker::spawn();
    worker.send(StampCommand::LoadRecipients {
        path: recipients_csv,
    })?;

    let recipients = match updates.recv().await {
        Some(StampUpdate::RecipientsLoaded { recipients }) => recipients,
        Some(StampUpdate::Error { message }) => bail!(message),
        other => bail!("Unexpected worker response: {:?}", other),
    };
    ensure!(!recipients.is_empty(), "Recipient list is empty");
    log::info!("Loaded {} recipient(s)", recipients.len());

    worker.send(StampCommand::Batch {
        template_path: template,
        recipients,
        position,
        options,
    })?;

    let summary = loop {
        match updates.recv().await {
            Some(StampUpdate::Progress(progress)) => match &progress.error {
                None => println!(
                    "[{}/{}] {} ok",
                    progress.completed, progress.total, progress.recipient
                ),
                Some(reason) => println!(
                    "[{}/{}] {} FAILED: {}",
                    progress.completed, progress.total, progress.recipient, reason
                ),
            },
            Some(StampUpdate::BatchComplete { summary }) => break summary,
            Some(StampUpdate::Error { message }) => bail!(message),
            Some(other) => log::debug!("Ignoring worker update {:?}", other),
            None => bail!("Worker stopped before the batch finished"),
        }
    };

    worker.shutdown().await?;
    Ok(summary)
}

async fn run_positions(action: PositionsAction) -> Result<()> {
    match action {
        PositionsAction::List { file } => {
            let store = PositionTemplateStore::load(&file).await?;
            if store.templates.is_empty() {
                println!("No saved positions in {}", file.display());
            }
            for template in &store.templates {
                let p = &template.position;
                println!(
                    "{}: page {} at ({}, {}) size {} x {}",
                    template.name, p.page, p.x, p.y, p.width, p.height
                );
            }
        }

        PositionsAction::Save {
            file,
            name,
            coordinates,
        } => {
            let name = name.trim();
            ensure!(!name.is_empty(), "Position name cannot be empty");
            let position = Position::from(&coordinates);
            // Page size is unknown until the position is used
            validate_position(&position, f32::MAX, f32::MAX)?;

            let mut store = PositionTemplateStore::load(&file).await?;
            store.upsert(name, position);
            store.save(&file).await?;
            println!("Saved position '{}' → {}", name, file.display());
        }

        PositionsAction::Remove { file, name } => {
            let mut store = PositionTemplateStore::load(&file).await?;
            if !store.remove(&name) {
                bail!("No saved position named '{}'", name);
            }
            store.save(&file).await?;
            println!("Removed position '{}'", name);
        }
    }
    Ok(())
}
