use std::error::Error;
use std::sync::Arc;

use atty::Stream;
use clap::{Parser, Subcommand};
use ordskatt::etymology::blocks_to_markdown;
use ordskatt::{
    GENERATION_ERROR_MESSAGE, GeminiClient, Phase, ProviderConfig, ViewController, WordProvider,
    WordRecord, fetch_word, format_etymology,
};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "ordskatt",
    about = "Discover Norwegian words, their origins and illustrations",
    version
)]
pub struct Cli {
    /// Emit JSON instead of formatted text.
    #[arg(long, global = true)]
    json: bool,

    /// Override the text generation model.
    #[arg(long, global = true)]
    text_model: Option<String>,

    /// Override the illustration model.
    #[arg(long, global = true)]
    image_model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a generated entry for a word, or a random word when none is given.
    Word {
        /// Word to look up.
        word: Option<String>,
        /// Skip the illustration request.
        #[arg(long)]
        no_image: bool,
    },
    /// Serve the single-page site over HTTP.
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8080.
        #[arg(long)]
        addr: Option<std::net::SocketAddr>,
        /// Public base URL used for canonical links.
        #[arg(long)]
        base_url: Option<String>,
    },
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let default_level = match cli.command {
        Command::Word { .. } => "warn",
        #[cfg(feature = "web")]
        Command::Serve { .. } => "info",
    };
    init_tracing(default_level);

    let mut config = ProviderConfig::from_env();
    if let Some(model) = cli.text_model {
        config.text_model = model;
    }
    if let Some(model) = cli.image_model {
        config.image_model = model;
    }
    let provider: Arc<dyn WordProvider> = Arc::new(GeminiClient::new(config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    match cli.command {
        Command::Word { word, no_image } => {
            runtime.block_on(handle_word(provider, word, no_image, cli.json))
        }
        #[cfg(feature = "web")]
        Command::Serve { addr, base_url } => {
            let mut web = ordskatt::web::WebConfig::from_env();
            if let Some(addr) = addr {
                web.addr = addr;
                web.base_url = format!("http://{addr}");
            }
            if let Some(base_url) = base_url {
                web.base_url = base_url.trim_end_matches('/').to_string();
            }
            runtime.block_on(ordskatt::web::serve(web, provider))?;
            Ok(())
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn handle_word(
    provider: Arc<dyn WordProvider>,
    word: Option<String>,
    no_image: bool,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let word = requested_word(word)?;
    let (record, image_url) = if no_image {
        let record = fetch_word(provider.as_ref(), word.as_deref())
            .await
            .map_err(|_| GENERATION_ERROR_MESSAGE)?;
        (record, None)
    } else {
        let controller = ViewController::new(provider);
        match word {
            Some(word) => {
                controller.set_query(word);
                if !controller.submit_search().await {
                    return Err(EMPTY_WORD.into());
                }
            }
            None => controller.fetch_random().await,
        }
        let state = controller.snapshot();
        match (state.phase, state.record) {
            (Phase::Ready, Some(record)) => (record, state.image_url),
            _ => {
                return Err(state
                    .error
                    .unwrap_or_else(|| GENERATION_ERROR_MESSAGE.to_string())
                    .into());
            }
        }
    };

    if as_json {
        let payload = json!({
            "record": record,
            "etymology": format_etymology(&record.etymology),
            "imageUrl": image_url,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_entry(&record, image_url.as_deref());
    }
    Ok(())
}

const EMPTY_WORD: &str = "Search word cannot be empty";

/// An explicitly given word must not be blank; `None` asks for a random word.
fn requested_word(word: Option<String>) -> Result<Option<String>, &'static str> {
    match word {
        Some(word) if word.trim().is_empty() => Err(EMPTY_WORD),
        other => Ok(other),
    }
}

fn entry_markdown(record: &WordRecord, image_url: Option<&str>) -> String {
    let mut text = format!(
        "# {}\n*{}*\n\n{}\n\n## Opprinnelse\n\n{}",
        record.word,
        record.word_class,
        record.definition,
        blocks_to_markdown(&format_etymology(&record.etymology))
    );
    if let Some(forms) = format_list(&record.inflections, 12) {
        text.push_str(&format!("\n## Bøyning og former\n\n{forms}\n"));
    }
    text.push_str(&format!("\n## Eksempel\n\n> {}\n", record.usage_example));
    if let Some(fact) = &record.fun_fact {
        text.push_str(&format!("\n## Visste du?\n\n{fact}\n"));
    }
    text.push_str(&format!("\n*Illustrasjon: {}*\n", describe_image(image_url)));
    text
}

fn format_list(items: &[String], limit: usize) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let truncated = items.len() > limit;
    let display = if truncated { &items[..limit] } else { items };
    let mut text = display.join(", ");
    if truncated {
        text.push_str(", …");
    }
    Some(text)
}

fn describe_image(image_url: Option<&str>) -> String {
    let Some(uri) = image_url else {
        return "ingen".to_string();
    };
    let (header, data) = uri.split_once(',').unwrap_or(("", uri));
    let mime = header
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .filter(|mime| !mime.is_empty())
        .unwrap_or("ukjent type");
    let kib = (data.len() * 3 / 4).div_ceil(1024);
    format!("{mime}, ca. {kib} KiB")
}

fn print_entry(record: &WordRecord, image_url: Option<&str>) {
    let markdown = entry_markdown(record, image_url);
    if stdout_is_tty() {
        let skin = markdown_skin();
        let formatted = FmtText::from(&skin, &markdown, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{markdown}");
    }
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn markdown_skin() -> MadSkin {
    MadSkin::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> WordRecord {
        WordRecord {
            word: "fjord".into(),
            word_class: "Substantiv".into(),
            definition: "En lang, smal havarm.".into(),
            etymology: "Fra norrønt.\n- fjǫrðr\n- ferd".into(),
            usage_example: "Vi seilte inn fjorden.".into(),
            inflections: vec!["fjorden".into(), "fjorder".into()],
            fun_fact: None,
        }
    }

    #[test]
    fn markdown_contains_sections() {
        let text = entry_markdown(&record(), None);
        assert!(text.starts_with("# fjord\n*Substantiv*"));
        assert!(text.contains("* fjǫrðr\n* ferd\n"));
        assert!(text.contains("fjorden, fjorder"));
        assert!(text.contains("> Vi seilte inn fjorden."));
        assert!(!text.contains("Visste du?"));
        assert!(text.contains("Illustrasjon: ingen"));
    }

    #[test]
    fn blank_word_argument_is_rejected() {
        assert_eq!(requested_word(Some("  ".into())), Err(EMPTY_WORD));
        assert_eq!(requested_word(Some("fjord".into())), Ok(Some("fjord".into())));
        assert_eq!(requested_word(None), Ok(None));
    }

    #[test]
    fn list_formatting_truncates() {
        let items: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        assert_eq!(format_list(&items, 3).as_deref(), Some("0, 1, 2, …"));
        assert_eq!(format_list(&[], 3), None);
    }

    #[test]
    fn image_description_reads_data_uri() {
        assert_eq!(
            describe_image(Some("data:image/png;base64,AAAA")),
            "image/png, ca. 1 KiB"
        );
    }
}
