use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medias_cli::client::{ApiClient, CreateMediaBody, Reservation};
use medias_cli::file::prepare_file;
use medias_cli::{init_tracing, parse_tags};
use medias_core::models::Media;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "medias")]
#[command(about = "Reserve, upload and finalize media against a Medias API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct MediaArgs {
    /// File to reserve
    #[arg(long, value_name = "PATH")]
    file: PathBuf,

    /// Optional description
    #[arg(long)]
    desc: Option<String>,

    /// MIME type (detected from the extension when omitted)
    #[arg(long)]
    mime: Option<String>,

    /// Comma-separated names of existing tags
    #[arg(long)]
    tags: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reserve a media record and print its presigned upload URL
    Media(MediaArgs),
    /// PUT a file to a presigned URL
    S3 {
        #[arg(long)]
        url: String,
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// Reserve, upload and finalize in one go
    Full(MediaArgs),
    /// Verify the upload and finalize a media record
    Finalize {
        #[arg(long)]
        id: Uuid,
    },
    /// Show a media record with its download URL
    Get {
        #[arg(long)]
        id: Uuid,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TagCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        desc: Option<String>,
    },
    List {
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let client = ApiClient::from_env()?;
    tracing::debug!(api = %client.base_url(), "Using API");

    match cli.command {
        Command::Media(args) => {
            let (reservation, _) = reserve(&client, &args).await?;
            print_reservation(&reservation);
        }
        Command::S3 { url, file } => {
            let prepared = prepare_file(&file, None).await?;
            client
                .upload_to_presigned(&url, prepared.contents, &prepared.mime_type)
                .await?;
            println!("Uploaded {} ({} bytes)", prepared.filename, prepared.size);
        }
        Command::Full(args) => {
            let (reservation, contents) = reserve(&client, &args).await?;
            print_reservation(&reservation);

            let url = reservation
                .media
                .url
                .as_deref()
                .context("Reservation carried no upload URL")?;
            client
                .upload_to_presigned(url, contents, &reservation.media.mime_type)
                .await?;
            println!("Uploaded {} bytes", reservation.media.size);

            let media = client.finalize_media(reservation.media.id).await?;
            print_media(&media)?;
        }
        Command::Finalize { id } => {
            let media = client.finalize_media(id).await?;
            print_media(&media)?;
        }
        Command::Get { id } => {
            let media = client.get_media(id).await?;
            print_media(&media)?;
        }
        Command::Tag { command } => match command {
            TagCommand::Create { name, desc } => {
                let tag = client.create_tag(&name, desc.as_deref()).await?;
                println!("{}", serde_json::to_string_pretty(&tag)?);
            }
            TagCommand::List { limit, offset } => {
                let list = client.list_tags(limit, offset).await?;
                for tag in &list.data {
                    println!("{}\t{}", tag.id, tag.name);
                }
                println!(
                    "showing {} of {} (offset {}, limit {})",
                    list.data.len(),
                    list.pagination.total,
                    list.pagination.offset,
                    list.pagination.limit
                );
            }
        },
    }

    Ok(())
}

/// Reserve `args.file`, returning the reservation and the file contents for upload.
async fn reserve(client: &ApiClient, args: &MediaArgs) -> Result<(Reservation, Vec<u8>)> {
    let prepared = prepare_file(Path::new(&args.file), args.mime.as_deref()).await?;
    let tags = parse_tags(args.tags.as_deref());

    let reservation = client
        .create_media(&CreateMediaBody {
            title: &prepared.filename,
            description: args.desc.as_deref(),
            mime_type: &prepared.mime_type,
            size: prepared.size,
            sha256: &prepared.sha256,
            tags: &tags,
        })
        .await?;

    Ok((reservation, prepared.contents))
}

fn print_reservation(reservation: &Reservation) {
    let action = if reservation.created {
        "Reserved"
    } else {
        "Existing reservation"
    };
    println!("{} {}", action, reservation.media.id);
    if let Some(url) = &reservation.media.url {
        println!("Upload URL: {}", url);
    }
}

fn print_media(media: &Media) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(media)?);
    Ok(())
}
