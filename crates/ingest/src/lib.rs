pub mod config;
pub mod pgn;
pub mod reader;

pub use config::ExtractionConfig;
pub use pgn::{MainlineMove, ParsedGame, parse_game};
pub use reader::{PoolReader, PoolRow};

use anyhow::Result;
use curate::{AnnotatedMoveRecord, CommentCurator, JsonlWriter};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionStats {
    /// Rows that produced a replayable game
    pub games_read: usize,
    /// Rows without text or without a usable main line
    pub games_skipped: usize,
    pub total_comments: usize,
    pub high_quality_comments: usize,
    pub comments_with_tags: usize,
    pub records_written: usize,
}

/// Curate every commented main-line move of one game.
pub fn annotate_game(
    game_idx: usize,
    game: &ParsedGame,
    curator: &CommentCurator,
    stats: &mut ExtractionStats,
) -> Vec<AnnotatedMoveRecord> {
    let mut records = Vec::new();

    for mv in game.commented_moves() {
        stats.total_comments += 1;

        let Ok(curated) = curator.curate(&mv.comment) else {
            continue;
        };
        stats.high_quality_comments += 1;
        if !curated.tags.is_empty() {
            stats.comments_with_tags += 1;
        }

        records.push(AnnotatedMoveRecord {
            id: AnnotatedMoveRecord::make_id(game_idx, mv.fullmove_number, mv.white_to_move),
            game_idx,
            fen: mv.fen.clone(),
            san: mv.san.clone(),
            move_uci: mv.uci.clone(),
            explanation: curated.explanation,
            tags: curated.tags,
            event: game.provenance.event.clone(),
            annotator: game.provenance.annotator.clone(),
            link: game.provenance.link.clone(),
        });
    }

    records
}

/// Stream pool rows into the sink. Unusable rows and games are skipped.
pub fn extract_into<I>(
    rows: I,
    curator: &CommentCurator,
    keep_untagged: bool,
    sink: &mut JsonlWriter,
) -> Result<ExtractionStats>
where
    I: IntoIterator<Item = Result<PoolRow>>,
{
    let mut stats = ExtractionStats::default();

    for row in rows {
        let row = row?;
        let Some(text) = row.text else {
            stats.games_skipped += 1;
            continue;
        };
        let Some(game) = parse_game(&text) else {
            debug!(game_idx = row.game_idx, "No usable main line, skipping game");
            stats.games_skipped += 1;
            continue;
        };
        stats.games_read += 1;

        for record in annotate_game(row.game_idx, &game, curator, &mut stats) {
            if !keep_untagged && record.tags.is_empty() {
                continue;
            }
            sink.write(&record)?;
            stats.records_written += 1;
        }

        if stats.games_read % 10_000 == 0 {
            info!(games = stats.games_read, records = stats.records_written, "Processing games");
        }
    }

    Ok(stats)
}

/// Main extraction pipeline
pub fn run_extraction(config: &ExtractionConfig) -> Result<ExtractionStats> {
    let curator = CommentCurator::new(&config.curation)?;
    let pool = PoolReader::open(&config.input)?;
    let mut sink = JsonlWriter::create(&config.output)?;

    info!(input = ?config.input, output = ?config.output, "Extracting annotated moves");
    let stats = extract_into(pool, &curator, config.keep_untagged, &mut sink)?;
    sink.finish()?;

    info!(
        games_read = stats.games_read,
        games_skipped = stats.games_skipped,
        total_comments = stats.total_comments,
        high_quality = stats.high_quality_comments,
        with_tags = stats.comments_with_tags,
        written = stats.records_written,
        "Finished extraction"
    );
    Ok(stats)
}
