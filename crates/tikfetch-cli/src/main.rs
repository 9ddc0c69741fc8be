use app_actions::{
    dispatchers::{DispatchOutcome, Dispatcher, FallbackTool, MediaKind, SaveMethod},
    resolvers::{LinkCandidate, LinkError, MediaMetadata, ResolutionFailure, Resolver},
};
use app_config::{
    conditional::cli::{CliConfig, KindSelection},
    Config,
};
use app_helpers::seen_before::SeenBefore;

#[tokio::main]
async fn main() {
    let config = Config::global();

    app_logger::init_with_verbosity(config.run.verbosity);

    app_logger::debug!(config = ?*config, "Running with config");

    let cli_config = config.cli();

    if !SeenBefore::from_config().check_and_mark() {
        if let Some(hint) = first_run_hint() {
            app_logger::info!("{hint}");
        }
    }

    let (links, invalid) = parse_links(&cli_config.entries_group.all());
    for (raw, e) in &invalid {
        app_logger::error!("Skipping {raw:?}: {e}");
    }

    let resolver = match Resolver::from_config(&config.endpoint) {
        Ok(x) => x,
        Err(e) => {
            app_logger::error!("Failed to set up resolver: {e:?}");
            std::process::exit(1);
        }
    };

    let dispatcher = match Dispatcher::from_config(config, &cli_config.output_directory) {
        Ok(x) => x,
        Err(e) => {
            app_logger::error!("Failed to set up downloads: {e:?}");
            std::process::exit(1);
        }
    };

    if cli_config.alternatives {
        for link in &links {
            open_alternatives(&dispatcher, link).await;
        }

        if !run_succeeded(0, invalid.len()) {
            std::process::exit(1);
        }

        return;
    }

    app_logger::info!("Outputting to {:?}", cli_config.output_directory);

    let mut failed = vec![];
    for link in &links {
        if let Err(e) = process_link(&resolver, &dispatcher, cli_config, link).await {
            failed.push((link, e));
        }
    }

    app_logger::info!(
        "Done: {} links ok, {} failed, {} skipped",
        links.len() - failed.len(),
        failed.len(),
        invalid.len()
    );

    if !run_succeeded(failed.len(), invalid.len()) {
        for (link, e) in failed {
            app_logger::error!("Failed to fetch {link}: {e}");
        }

        std::process::exit(1);
    }
}

async fn process_link(
    resolver: &Resolver,
    dispatcher: &Dispatcher,
    cli_config: &CliConfig,
    link: &LinkCandidate,
) -> anyhow::Result<()> {
    let metadata = match resolver.resolve_link(link).await {
        Ok(x) => x,
        Err(ResolutionFailure::AllSourcesExhausted(reports)) if cli_config.placeholder_on_failure => {
            app_logger::warn!(?reports, "Every source failed, showing placeholder");
            MediaMetadata::placeholder(link.clone())
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", metadata.preview());

    if cli_config.preview_only {
        return Ok(());
    }

    let mut unavailable = vec![];
    for kind in wanted_kinds(cli_config.kind) {
        match dispatcher.download(&metadata, kind).await {
            DispatchOutcome::Saved { method, url, .. } => report_saved(kind, &url, &method),
            DispatchOutcome::Unavailable => {
                match dispatcher.open_alternative(link, kind).await {
                    Ok(url) => app_logger::warn!("No {kind} found, opened {url} instead"),
                    Err(e) => {
                        app_logger::warn!(?e, "No {kind} found and no alternative opened");
                        println!("{}", FallbackTool::for_kind(kind).url_for(link));
                    }
                }
                unavailable.push(kind);
            }
        }
    }

    if !unavailable.is_empty() {
        anyhow::bail!("Nothing to download for {unavailable:?}");
    }

    Ok(())
}

fn report_saved(kind: MediaKind, url: &url::Url, method: &SaveMethod) {
    match method {
        SaveMethod::File(path) => app_logger::info!("Saved {kind} to {path:?}"),
        SaveMethod::NewContext => app_logger::info!("Opened {kind} in the browser: {url}"),
        SaveMethod::Navigated => app_logger::info!("Open the {kind} yourself: {url}"),
    }
}

async fn open_alternatives(dispatcher: &Dispatcher, link: &LinkCandidate) {
    for (tool, res) in dispatcher.open_all_alternatives(link).await {
        match res {
            Ok(url) => app_logger::info!("Opened {} for {link}: {url}", tool.name()),
            Err(e) => {
                let url = tool.url_for(link);
                app_logger::warn!(?e, "Couldn't open {}", tool.name());
                println!("{url}");
            }
        }
    }
}

fn wanted_kinds(selection: KindSelection) -> Vec<MediaKind> {
    let mut kinds = vec![];

    if selection.wants_video() {
        kinds.push(MediaKind::Video);
    }

    if selection.wants_audio() {
        kinds.push(MediaKind::Audio);
    }

    kinds
}

fn parse_links<'a>(
    raw: &[&'a str],
) -> (Vec<LinkCandidate>, Vec<(&'a str, LinkError)>) {
    let mut links = vec![];
    let mut invalid = vec![];

    for x in raw {
        match LinkCandidate::parse(x) {
            Ok(link) => links.push(link),
            Err(e) => invalid.push((*x, e)),
        }
    }

    (links, invalid)
}

/// Links that failed or were skipped both fail the run
const fn run_succeeded(failed: usize, skipped: usize) -> bool {
    failed == 0 && skipped == 0
}

/// Sample preview logged (to stderr) on the very first run
fn first_run_hint() -> Option<String> {
    MediaMetadata::demo().map(|demo| {
        format!(
            "First run, this is what a preview looks like:\n{}",
            demo.preview()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_selection() {
        assert_eq!(wanted_kinds(KindSelection::Video), [MediaKind::Video]);
        assert_eq!(wanted_kinds(KindSelection::Audio), [MediaKind::Audio]);
        assert_eq!(
            wanted_kinds(KindSelection::Both),
            [MediaKind::Video, MediaKind::Audio]
        );
    }

    #[test]
    fn invalid_links_are_split_out() {
        let (links, invalid) = parse_links(&[
            "https://vm.tiktok.com/ZMabc/",
            "https://example.com",
            "https://www.tiktok.com/@a/video/1",
        ]);

        assert_eq!(links.len(), 2);
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].0, "https://example.com");
    }

    #[test]
    fn skipped_links_fail_the_run() {
        assert!(run_succeeded(0, 0));
        assert!(!run_succeeded(0, 1));
        assert!(!run_succeeded(2, 0));
    }

    #[test]
    fn first_run_hint_shows_the_demo_preview() {
        let hint = first_run_hint().expect("demo preview");

        assert!(hint.contains("Beautiful Nature - Scenic Views"));
        assert!(hint.contains("@nature_lover"));
        assert!(!hint.contains("Pass a TikTok link"));
    }
}
