use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};
use tracing::{error, info, info_span};

use crate::cli::{Command, PreviewArgs};
use crate::config::AppConfig;
use crate::core::reorganize::{reorganize, Split};
use crate::core::sample::{preview_samples, FsImageLoader, GridPresenter, LogPresenter};
use crate::core::stats::{count_labels, write_stats, LabelCounts};
use crate::ui::EguiGridPresenter;

const MENU: &str = "
=== MENU ===
1. Compute and show stats
2. Save stats
3. Preview samples
4. Reorganize dataset
5. Quit";

/// Runs commands against one configuration and writes their results to `out`.
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn run(&self, command: &Command, out: &mut dyn Write) -> anyhow::Result<()> {
        match command {
            Command::Stats { json } => self.show_stats(*json, out),
            Command::SaveStats => self.save_stats(out),
            Command::Preview(args) => self.preview(args, out),
            Command::Reorganize { json } => self.reorganize(*json, out),
            Command::InitConfig { path } => {
                let path = match path {
                    Some(path) => path.clone(),
                    None => AppConfig::default_path()
                        .context("could not determine config directory")?,
                };
                self.config.save(&path)?;
                writeln!(out, "Settings written to {}", path.display())?;
                Ok(())
            }
        }
    }

    fn split_counts(&self, split: Split) -> anyhow::Result<LabelCounts> {
        let manifest = &self.config.split_source(split).manifest;
        count_labels(manifest).with_context(|| format!("cannot compute {} stats", split))
    }

    pub fn show_stats(&self, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
        let _span = info_span!("stats").entered();

        let train = self.split_counts(Split::Train)?;
        let test = self.split_counts(Split::Test)?;

        if json {
            let value = serde_json::json!({ "train": train, "test": test });
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        } else {
            writeln!(out, "{}", train.to_report("Train"))?;
            writeln!(out, "{}", test.to_report("Test"))?;
        }
        Ok(())
    }

    pub fn save_stats(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let _span = info_span!("save_stats").entered();

        for split in Split::ALL {
            let counts = self.split_counts(split)?;
            let output = self.config.stats_output(split);
            write_stats(&counts, output)
                .with_context(|| format!("cannot write {}", output.display()))?;
        }
        writeln!(out, "Stats saved.")?;
        Ok(())
    }

    /// Preview with the presenter the arguments ask for.
    pub fn preview(&self, args: &PreviewArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        if args.headless {
            self.preview_with(args, &mut LogPresenter, out)
        } else {
            let mut window = EguiGridPresenter::new("Dataset samples", self.config.tile_size);
            self.preview_with(args, &mut window, out)
        }
    }

    pub fn preview_with(
        &self,
        args: &PreviewArgs,
        presenter: &mut dyn GridPresenter,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let _span = info_span!("preview").entered();

        let manifest = args
            .manifest
            .clone()
            .unwrap_or_else(|| self.config.train_manifest.clone());
        let images = args
            .images
            .clone()
            .unwrap_or_else(|| self.config.train_images.clone());

        let mut rng = match args.seed.or(self.config.preview_seed) {
            Some(seed) => {
                info!("Sampling with seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let outcome = preview_samples(
            &manifest,
            &images,
            args.count,
            &mut rng,
            &FsImageLoader,
            presenter,
        )
        .context("cannot preview samples")?;

        if !outcome.has_samples() {
            writeln!(out, "No valid images to display.")?;
            return Ok(());
        }

        writeln!(out, "Displayed samples:")?;
        for (name, entry) in &outcome.samples {
            writeln!(
                out,
                "{} -> path: {}, label: {}",
                name,
                entry.path.display(),
                entry.label
            )?;
        }
        Ok(())
    }

    pub fn reorganize(&self, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
        let _span = info_span!("reorganize").entered();

        let result = reorganize(&self.config.reorganize_request())
            .context("reorganization stopped")?;

        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        } else {
            writeln!(out, "Reorganization complete.")?;
            write!(out, "{}", result.to_report())?;
        }
        Ok(())
    }

    /// Numbered menu loop. Ends on choice 5 or end of input. A failing
    /// operation is reported and the menu keeps going.
    pub fn run_menu<R: BufRead>(&self, mut input: R, out: &mut dyn Write) -> anyhow::Result<()> {
        loop {
            writeln!(out, "{}", MENU)?;
            write!(out, "Choose an option: ")?;
            out.flush()?;

            let Some(choice) = read_line(&mut input)? else {
                info!("Input closed, leaving menu");
                return Ok(());
            };

            let result = match choice.as_str() {
                "1" => self.show_stats(false, out),
                "2" => self.save_stats(out),
                "3" => {
                    write!(out, "How many images to show? ")?;
                    out.flush()?;
                    let Some(answer) = read_line(&mut input)? else {
                        return Ok(());
                    };
                    match answer.parse::<usize>() {
                        Ok(count) => self.preview(&PreviewArgs::with_count(count), out),
                        Err(_) => {
                            writeln!(out, "Invalid input, enter a number.")?;
                            continue;
                        }
                    }
                }
                "4" => self.reorganize(false, out),
                "5" => {
                    writeln!(out, "Goodbye.")?;
                    return Ok(());
                }
                _ => {
                    writeln!(out, "Invalid option, try again.")?;
                    continue;
                }
            };

            if let Err(e) = result {
                error!("{:#}", e);
                writeln!(out, "Error: {:#}", e)?;
            }
        }
    }
}

/// Next trimmed line, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample::{GridLayout, Tile};
    use crate::core::stats::read_stats;
    use image::{GrayImage, Luma};
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_in(root: &Path) -> AppConfig {
        AppConfig {
            train_manifest: root.join("train_data.csv"),
            test_manifest: root.join("test_data.csv"),
            train_images: root.join("raw/train"),
            test_images: root.join("raw/test"),
            dataset_root: root.join("dataset"),
            train_stats_output: root.join("stats_train.csv"),
            test_stats_output: root.join("stats_test.csv"),
            log_dir: None,
            ..AppConfig::default()
        }
    }

    fn seed_dataset(root: &Path) {
        fs::create_dir_all(root.join("raw/train")).unwrap();
        fs::create_dir_all(root.join("raw/test")).unwrap();
        for name in ["a.png", "b.png"] {
            GrayImage::from_pixel(28, 28, Luma([200]))
                .save(root.join("raw/train").join(name))
                .unwrap();
        }
        GrayImage::from_pixel(28, 28, Luma([10]))
            .save(root.join("raw/test/t.png"))
            .unwrap();
        fs::write(
            root.join("train_data.csv"),
            "path,label\nimgs/a.png,3\nimgs/b.png,9\nimgs/c.png,99\n",
        )
        .unwrap();
        fs::write(root.join("test_data.csv"), "path,label\nimgs/t.png,0\n").unwrap();
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[derive(Default)]
    struct CountingPresenter {
        tiles: usize,
    }

    impl GridPresenter for CountingPresenter {
        fn present(&mut self, tiles: Vec<Tile>, _layout: GridLayout) {
            self.tiles += tiles.len();
        }
    }

    #[test]
    fn test_show_stats_report() {
        let dir = tempdir().unwrap();
        seed_dataset(dir.path());
        let app = App::new(config_in(dir.path()));
        let mut out = Vec::new();

        app.show_stats(false, &mut out).unwrap();

        let text = output(out);
        assert!(text.contains("Statistics for Train"));
        assert!(text.contains("Digit 3 : 1 images"));
        assert!(text.contains("Digit 9 : 1 images"));
        assert!(text.contains("Statistics for Test"));
        assert!(text.contains("Digit 0 : 1 images"));
    }

    #[test]
    fn test_show_stats_json() {
        let dir = tempdir().unwrap();
        seed_dataset(dir.path());
        let app = App::new(config_in(dir.path()));
        let mut out = Vec::new();

        app.show_stats(true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(value["train"]["3"], 1);
        assert_eq!(value["test"]["0"], 1);
    }

    #[test]
    fn test_save_stats_writes_both_files() {
        let dir = tempdir().unwrap();
        seed_dataset(dir.path());
        let config = config_in(dir.path());
        let app = App::new(config.clone());

        app.save_stats(&mut Vec::new()).unwrap();

        assert_eq!(read_stats(&config.train_stats_output).unwrap().total(), 2);
        assert_eq!(read_stats(&config.test_stats_output).unwrap().total(), 1);
    }

    #[test]
    fn test_preview_lists_loaded_samples() {
        let dir = tempdir().unwrap();
        seed_dataset(dir.path());
        let app = App::new(config_in(dir.path()));
        let mut presenter = CountingPresenter::default();
        let mut out = Vec::new();
        let args = PreviewArgs {
            seed: Some(11),
            ..PreviewArgs::with_count(10)
        };

        app.preview_with(&args, &mut presenter, &mut out).unwrap();

        let text = output(out);
        assert_eq!(presenter.tiles, 2);
        assert!(text.contains("a.png -> path:"));
        assert!(text.contains("label: 9"));
        assert!(!text.contains("c.png"));
    }

    #[test]
    fn test_preview_reports_when_nothing_loads() {
        let dir = tempdir().unwrap();
        seed_dataset(dir.path());
        let app = App::new(config_in(dir.path()));
        let mut presenter = CountingPresenter::default();
        let mut out = Vec::new();
        let args = PreviewArgs {
            images: Some(dir.path().join("nowhere")),
            ..PreviewArgs::with_count(3)
        };

        app.preview_with(&args, &mut presenter, &mut out).unwrap();

        assert!(output(out).contains("No valid images to display."));
        assert_eq!(presenter.tiles, 0);
    }

    #[test]
    fn test_reorganize_command_copies_files() {
        let dir = tempdir().unwrap();
        seed_dataset(dir.path());
        let app = App::new(config_in(dir.path()));
        let mut out = Vec::new();

        app.reorganize(true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(value["counts"]["train"]["3"], 1);
        assert_eq!(value["counts"]["test"]["0"], 1);
        assert!(dir.path().join("dataset/train/9/b.png").is_file());
    }

    #[test]
    fn test_init_config_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let app = App::new(config_in(dir.path()));

        app.run(&Command::InitConfig { path: Some(path.clone()) }, &mut Vec::new())
            .unwrap();

        assert_eq!(&AppConfig::from_file(&path).unwrap(), app.config());
    }

    #[test]
    fn test_menu_runs_choices_until_quit() {
        let dir = tempdir().unwrap();
        seed_dataset(dir.path());
        let config = config_in(dir.path());
        let app = App::new(config.clone());
        let mut out = Vec::new();

        app.run_menu(Cursor::new("1\n7\n2\n5\n1\n"), &mut out).unwrap();

        let text = output(out);
        assert!(text.contains("Statistics for Train"));
        assert!(text.contains("Invalid option, try again."));
        assert!(text.contains("Stats saved."));
        assert!(text.contains("Goodbye."));
        assert_eq!(text.matches("Statistics for Train").count(), 1);
        assert!(config.train_stats_output.is_file());
    }

    #[test]
    fn test_menu_keeps_going_after_error() {
        let dir = tempdir().unwrap();
        let app = App::new(config_in(dir.path()));
        let mut out = Vec::new();

        app.run_menu(Cursor::new("1\n3\nmany\n"), &mut out).unwrap();

        let text = output(out);
        assert!(text.contains("Error: cannot compute train stats"));
        assert!(text.contains("Invalid input, enter a number."));
    }
}
