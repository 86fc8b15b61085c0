use clap::{Parser, Subcommand};
use std::path::PathBuf;
use waypost::resolve::{LinkResolver, LinkTarget};
use waypost::{config, filter, frontmatter, generate, index, normalize, output, scan};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "waypost")]
#[command(about = "Static site generator for browsable markdown note collections")]
#[command(long_about = "\
Static site generator for browsable markdown note collections

Your filesystem is the data source. Markdown files become posts, their
directory tree becomes the browse hierarchy, and internal links are
resolved against the whole collection so they survive moves and renames.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  └── posts/                       # Scanned recursively for *.md
      ├── Meta.md
      ├── engine/
      │   ├── Overview.md
      │   └── rendering/
      │       └── Pipeline.md      # Links like ../Overview.md resolve
      └── worklog/
          └── 2025/
              └── January.md

Frontmatter (all fields optional):

  ---
  title: \"Render Pipeline\"
  date: \"2025-03-14\"
  category: \"engine-summary\"
  track: \"rendering\"
  status: \"stable\"
  tags: [\"gpu\", \"vulkan\"]
  lang: \"en\"
  ---

Run 'waypost gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".waypost-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Filter flags shared by the `list` command.
#[derive(clap::Args, Clone)]
struct FilterArgs {
    /// Only posts in this category
    #[arg(long)]
    category: Option<String>,

    /// Only posts in this track
    #[arg(long)]
    track: Option<String>,

    /// Only posts carrying this tag (exact match)
    #[arg(long)]
    tag: Option<String>,

    /// Only posts under this directory, relative to the section root
    #[arg(long)]
    section: Option<String>,

    /// Case-insensitive substring match over title, summary, taxonomy, path
    #[arg(long)]
    query: Option<String>,

    /// Only posts in this language
    #[arg(long)]
    lang: Option<String>,
}

impl FilterArgs {
    fn into_filters(self) -> filter::Filters {
        filter::Filters {
            category: self.category.map(filter::CategoryFilter::Is),
            track: self.track,
            tag: self.tag,
            section: self.section,
            query: self.query,
            lang: self.lang,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory into a manifest
    Scan,
    /// Produce the final HTML site from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Audit every internal link and alias without building
    Check,
    /// List posts matching the given filters
    List(FilterArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            generate::generate(&manifest_path, &cli.source, &cli.output)?;
            let manifest_content = std::fs::read_to_string(&manifest_path)?;
            let manifest: scan::Manifest = serde_json::from_str(&manifest_content)?;
            output::print_generate_output(&manifest);
        }
        Command::Build => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&manifest);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            run_check(&cli.source)?;
        }
        Command::List(filter_args) => {
            let manifest = scan::scan(&cli.source)?;
            let section_root = manifest.config.section_root.clone();
            let index = index::PostIndex::build(manifest.posts)?;
            let filters = filter_args.into_filters();
            let results = filter::evaluate(&index, &filters, &section_root);
            output::print_list_output(&results);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve every link in every post the way the generator would, then
/// report anything a plain file server could not have served: recovered
/// references, search degradations, and alias entries pointing at dead
/// targets.
fn run_check(source: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = scan::scan(source)?;
    let site_config = manifest.config.clone();
    let index = index::PostIndex::build(manifest.posts)?;
    let resolver = LinkResolver::new(&index, &site_config);

    let mut audits = Vec::new();
    for post in index.posts() {
        let text = std::fs::read_to_string(source.join(&post.path))?;
        let body = frontmatter::strip(&text);
        for href in generate::extract_links(body) {
            let target = resolver.resolve(&post.path, &href);
            audits.push(output::LinkAudit {
                source: post.path.clone(),
                href,
                target,
            });
        }
    }

    let dead_aliases: Vec<(String, String)> = site_config
        .aliases
        .iter()
        .filter(|(_, to)| !index.contains(to))
        .map(|(from, to)| (from.clone(), to.clone()))
        .collect();

    // A Post decision is "recovered" when it differs from where a plain
    // normalization of the authored href would have landed.
    let recovered = |audit: &output::LinkAudit| {
        let LinkTarget::Post { path, .. } = &audit.target else {
            return false;
        };
        let plain = audit.href.split('#').next().unwrap_or(&audit.href);
        *path != normalize::resolve_relative(&audit.source, plain)
    };

    output::print_check_output(&audits, &dead_aliases, recovered);
    println!("==> Check complete");
    Ok(())
}
