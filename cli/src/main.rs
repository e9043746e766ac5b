use clap::{Parser, Subcommand};
use lesson_shop::backend::ShopBackend;
use lesson_shop::error::{AppError, AppResult, run_with_error_handler};
use lesson_shop::model::LessonKey;
use lesson_shop::order::{OrderOutcome, SeatSyncStatus};
use lesson_shop::view::{SortDirection, SortField};
use lesson_shop::{Shop, build_shop};

#[derive(Parser, Debug)]
#[command(about = "Browse and book music lessons", long_about = None)]
pub struct Cli {
    /// Backend base url, overrides the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all lessons
    Lessons {
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long, default_value_t = false)]
        desc: bool,
    },

    /// Search lessons by free text
    Search {
        query: String,
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long, default_value_t = false)]
        desc: bool,
    },

    /// Book lessons
    Checkout {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        /// SUBJECT or SUBJECT:QTY, repeatable
        #[arg(long = "item", required = true, value_parser = parse_item)]
        items: Vec<(String, u32)>,
    },
}

fn parse_item(s: &str) -> Result<(String, u32), String> {
    match s.rsplit_once(':') {
        Some((subject, qty)) => {
            let qty: u32 = qty
                .trim()
                .parse()
                .map_err(|_| format!("invalid quantity in `{s}`"))?;
            if qty == 0 {
                return Err(format!("quantity must be at least 1 in `{s}`"));
            }
            Ok((subject.trim().to_string(), qty))
        }
        None => Ok((s.trim().to_string(), 1)),
    }
}

fn apply_sort<B: ShopBackend>(shop: &mut Shop<B>, sort: Option<SortField>, desc: bool) {
    if let Some(field) = sort {
        shop.set_sort_field(field);
    }
    if desc {
        shop.set_sort_direction(SortDirection::Desc);
    }
}

fn print_lessons<B: ShopBackend>(shop: &Shop<B>) {
    println!("{:<24} {:<16} {:>8} {:>6}", "SUBJECT", "LOCATION", "PRICE", "SPACES");
    for shown in shop.display_lessons() {
        let lesson = shown.lesson;
        println!(
            "{:<24} {:<16} {:>8.2} {:>6}",
            lesson.subject(),
            lesson.location(),
            lesson.price(),
            lesson.spaces()
        );
    }
}

async fn checkout<B: ShopBackend>(
    shop: &mut Shop<B>,
    name: &str,
    phone: &str,
    items: &[(String, u32)],
) -> AppResult<()> {
    shop.load_lessons().await?;

    for (subject, qty) in items {
        let key = LessonKey::new(subject.as_str());
        if shop.catalog().get(&key).is_none() {
            return Err(AppError::LessonNotFound(subject.clone()));
        }
        for _ in 0..*qty {
            if !shop.add_to_cart(&key) {
                tracing::warn!("no spaces left for {key}, booking fewer than requested");
                break;
            }
        }
    }

    shop.set_name(name);
    shop.set_phone(phone);

    let outcome = shop.submit_order().await?;
    println!("{}", shop.form().confirmation());

    if let OrderOutcome::Placed { seat_sync, .. } = outcome {
        for sync in seat_sync {
            match sync.status {
                SeatSyncStatus::Updated { spaces } => {
                    println!("  {}: {} spaces left", sync.key, spaces)
                }
                SeatSyncStatus::Failed { spaces, .. } => {
                    println!("  {}: {} spaces left (not synced)", sync.key, spaces)
                }
                SeatSyncStatus::Skipped => println!("  {}: not synced", sync.key),
            }
        }
    }

    shop.dismiss_confirmation();
    Ok(())
}

async fn run(args: &Cli) -> AppResult<()> {
    let mut shop = build_shop(args.base_url.as_deref()).await?;

    match &args.command {
        Commands::Lessons { sort, desc } => {
            shop.load_lessons().await?;
            apply_sort(&mut shop, *sort, *desc);
            print_lessons(&shop);
        }

        Commands::Search { query, sort, desc } => {
            shop.search(query).await?;
            apply_sort(&mut shop, *sort, *desc);
            print_lessons(&shop);
        }

        Commands::Checkout { name, phone, items } => {
            checkout(&mut shop, name, phone, items).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    lesson_shop::setup_trace();
    let args = Cli::parse();

    run_with_error_handler(async || run(&args).await).await;
}
