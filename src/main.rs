use clap::Parser;
use findbar::cli::Cli;
use findbar::config::{build_config, AppConfig};
use findbar::controller::SearchController;
use findbar::host::{BufferEditor, HostEditor};
use findbar::output::{describe_matches, render_json, render_plain};
use findbar::prefs::{default_prefs_path, load_prefs, SearchPrefs};

fn main() {
    let cli = Cli::parse();
    let app_config = build_config(&cli);

    if app_config.verbose {
        eprintln!("findbar: effective config: {:?}", app_config);
    }

    if let Err(e) = run(&cli, &app_config) {
        eprintln!("findbar: error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&cli.file)?;

    let prefs_path = if config.history.enabled {
        config.history.file.clone().or_else(default_prefs_path)
    } else {
        None
    };
    let prefs = match prefs_path {
        Some(ref path) => {
            if config.verbose {
                eprintln!("findbar: search history: {}", path.display());
            }
            load_prefs(path, config.history.depth)
        }
        None => SearchPrefs::with_depth(config.history.depth),
    };

    // A file we cannot write back is searched through a read-only editor.
    let read_only = cli.in_place && std::fs::metadata(&cli.file)?.permissions().readonly();
    let editor = if read_only {
        BufferEditor::read_only(text)
    } else {
        BufferEditor::new(text)
    };

    let mut controller = SearchController::new(prefs, config.default_modes);
    controller.bind(editor, false);

    // Flags win; otherwise reuse the modes this query was last run with.
    let modes = cli
        .explicit_modes()
        .or_else(|| controller.history().lookup(&cli.query))
        .unwrap_or(config.default_modes);
    controller.set_modes(modes);
    controller.on_query_edited(&cli.query);
    controller.activate("", false);

    let report = controller.report().unwrap_or_default();
    if config.verbose {
        eprintln!(
            "findbar: modes {} -> {} {}",
            controller.modes().to_block(),
            report.hit_count,
            controller.result().counter_display()
        );
    }
    if let Some(status) = report.status_message() {
        eprintln!("findbar: {}", status);
    }

    match cli.replace {
        Some(ref replacement) => {
            if !controller.can_replace() {
                return Err(format!("{} is read-only", cli.file.display()).into());
            }
            controller.replace(replacement);
            let editor = controller.unbind().ok_or("editor detached during replace")?;
            if cli.in_place {
                if editor.edit_count() > 0 {
                    std::fs::write(&cli.file, editor.text())?;
                }
            } else {
                print!("{}", editor.text());
            }
        }
        None => {
            if let Some(editor) = controller.host() {
                let records = describe_matches(editor.text(), controller.result());
                if cli.json {
                    println!("{}", render_json(&records)?);
                } else {
                    print!("{}", render_plain(&records));
                }
            }
            controller.deactivate(true);
        }
    }

    if let Some(ref path) = prefs_path {
        if let Err(e) = controller.prefs().save(path) {
            eprintln!(
                "findbar: warning: could not save search history {}: {}",
                path.display(),
                e
            );
        }
    }

    Ok(())
}
