// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use seg2poly::{
    ConvertOptions, Error, Progress,
    coco::{CategoryMapping, CocoReadOptions, PrefixStrategy},
};
use std::{path::PathBuf, sync::mpsc, thread};

/// Convert COCO instance segmentation annotations into oriented bounding box
/// labels.
///
/// Every `*.json` file below DATASET_PATH is expected at
/// `<parent>/annotations/<name>.json` with its images in
/// `<parent>/images/<prefix>/`. Labels are written to
/// `<parent>/labels/<prefix>/` and the list of converted images to
/// `<parent>/<prefix>.txt`.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory searched recursively for COCO annotation files
    dataset_path: PathBuf,

    /// Save segmentation and box overlays under <parent>/plots/<prefix>/
    #[clap(long)]
    plot: bool,

    /// Number of overlays rendered per prefix
    #[clap(long, default_value_t = 3)]
    max_plots: usize,

    /// Clamp corners to the image frame before normalizing
    #[clap(long)]
    clip: bool,

    /// Write raw category ids as class indices instead of the COCO 80 class
    /// table
    #[clap(long)]
    identity_categories: bool,

    /// How annotation files are matched to image directories
    #[clap(long, value_enum, default_value_t = Prefix::Exact)]
    prefix_strategy: Prefix,

    /// Only convert the first N images of each annotation file (0 = all)
    #[clap(long, default_value_t = 0)]
    max_images: usize,
}

#[derive(ValueEnum, PartialEq, Clone, Copy, Debug)]
enum Prefix {
    /// Directory name equals the file stem or one of its tokens
    Exact,
    /// First directory whose name occurs in the annotation path
    Substring,
}

impl From<Prefix> for PrefixStrategy {
    fn from(prefix: Prefix) -> Self {
        match prefix {
            Prefix::Exact => PrefixStrategy::Exact,
            Prefix::Substring => PrefixStrategy::Substring,
        }
    }
}

impl From<&Args> for ConvertOptions {
    fn from(args: &Args) -> Self {
        ConvertOptions {
            plot: args.plot,
            max_plots: args.max_plots,
            clip: args.clip,
            category_mapping: if args.identity_categories {
                CategoryMapping::Identity
            } else {
                CategoryMapping::Coco80
            },
            prefix_strategy: args.prefix_strategy.into(),
            read_options: CocoReadOptions {
                max_images: args.max_images,
            },
        }
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::with_template(
        "[{elapsed_precise} ETA: {eta}] {msg}: {wide_bar:.yellow} {human_pos}/{human_len}",
    )
    .map(|style| style.progress_chars("█▇▆▅▄▃▂▁  "))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message("Converting");
    bar
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = ConvertOptions::from(&args);

    let bar = progress_bar();
    let (tx, rx) = mpsc::channel::<Progress>();

    let reporter = {
        let bar = bar.clone();
        thread::spawn(move || {
            for progress in rx {
                if progress.total > 0 {
                    bar.set_length(progress.total as u64);
                    bar.set_position(progress.current as u64);
                }
            }
        })
    };

    let result = seg2poly::seg2poly(&args.dataset_path, &options, Some(tx));
    if reporter.join().is_err() {
        log::warn!("Progress reporter stopped unexpectedly");
    }
    bar.finish_and_clear();

    let summary = result?;
    println!("{}", summary);
    Ok(())
}
