use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use stylescout::{Scout, ScoutConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stylescout", version, about = "Report the fonts, colors, images, animations and icons a page uses")]
struct Cli {
    /// User agent sent with page and stylesheet requests
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Page load timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Do not fetch linked stylesheets for the cascade
    #[arg(long, global = true)]
    no_linked_styles: bool,

    /// Leave generic families (serif, system-ui, ...) out of the fonts list
    #[arg(long, global = true)]
    hide_generic_fonts: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full audit and write the report page
    Report {
        url: String,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print collected fonts, colors, images, stylesheet links and icons
    Artifacts {
        url: String,
        #[arg(long)]
        json: bool,
    },
    /// Print animation and transition declarations from linked stylesheets
    Animations { url: String },
    /// Hover the first element matching a selector and print its tooltip
    Inspect { url: String, selector: String },
}

impl Cli {
    fn config(&self) -> ScoutConfig {
        let mut config = ScoutConfig::default();
        if let Some(ua) = &self.user_agent {
            config.user_agent = ua.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        config.apply_linked_styles = !self.no_linked_styles;
        config.hide_generic_fonts = self.hide_generic_fonts;
        config
    }
}

fn print_list(heading: &str, items: &[String]) {
    println!("{} ({})", heading, items.len());
    for item in items {
        println!("  {}", item);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = Builder::from_env(Env::default().filter_or("RUST_LOG", "warn")).try_init();

    let cli = Cli::parse();
    let scout = Scout::new(Some(cli.config())).await.context("starting page host")?;
    let page = scout.new_page().await?;

    match &cli.command {
        Command::Report { url, output } => {
            page.goto(url).await.with_context(|| format!("loading {}", url))?;
            let report = page.report().await?;
            let html = report.to_page();
            match output {
                Some(path) => std::fs::write(path, html)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", html),
            }
        }
        Command::Artifacts { url, json } => {
            page.goto(url).await.with_context(|| format!("loading {}", url))?;
            let artifacts = page.collect().await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&artifacts)?);
            } else {
                print_list("fonts", &artifacts.fonts);
                print_list("colors", &artifacts.colors);
                print_list("images", &artifacts.images);
                print_list("stylesheets", &artifacts.external_css_links);
                println!("inline svgs ({})", artifacts.inline_svgs.len());
                print_list("svg images", &artifacts.svg_images);
            }
        }
        Command::Animations { url } => {
            page.goto(url).await.with_context(|| format!("loading {}", url))?;
            let audit = page.audit().await?;
            if audit.animations.is_empty() {
                println!("No animations or transitions found.");
            }
            for entry in &audit.animations {
                println!("{}  [{}]", entry.selector, entry.source);
                if let Some(animation) = &entry.animation {
                    println!("  animation: {}", animation);
                }
                if let Some(transition) = &entry.transition {
                    println!("  transition: {}", transition);
                }
            }
        }
        Command::Inspect { url, selector } => {
            page.goto(url).await.with_context(|| format!("loading {}", url))?;
            match page.inspect(selector).await? {
                Some(text) => println!("{}", text),
                None => bail!("no element matches {:?}", selector),
            }
        }
    }

    scout.close().await?;
    Ok(())
}
