//! Opening book trie and its loader.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chess_engine::{Position, SanError};
use thiserror::Error;

use crate::opening::OpeningLine;

/// Database files read by [`OpeningBook::load_dir`], in order.
pub const BOOK_FILES: [&str; 5] = ["a.tsv", "b.tsv", "c.tsv", "d.tsv", "e.tsv"];

/// Errors that can occur while building an opening book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Failed to read a database file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row does not have the `<eco>\t<name>\t<moves>` shape.
    #[error("line {line}: malformed opening record: {text:?}")]
    MalformedRow { line: usize, text: String },

    /// A move of an opening line could not be played.
    #[error("opening {name:?}: {source}")]
    Move {
        name: String,
        #[source]
        source: SanError,
    },

    /// An error inside a particular database file.
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<BookError>,
    },
}

#[derive(Debug, Clone, Default)]
struct Node {
    name: Option<String>,
    branches: BTreeMap<String, Node>,
}

/// A trie of opening lines keyed by move text.
///
/// Each edge is one move in UCI text (`"e2e4"`). A node carries a name when an
/// opening line ends there; lines sharing a prefix share nodes. The book is
/// immutable once built and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    root: Node,
    openings: usize,
    moves: usize,
}

impl OpeningBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from in-memory opening lines.
    pub fn from_lines<'a>(
        lines: impl IntoIterator<Item = &'a OpeningLine>,
    ) -> Result<Self, BookError> {
        let mut book = Self::new();
        for line in lines {
            book.insert(line)?;
        }
        Ok(book)
    }

    /// Loads `a.tsv` through `e.tsv` from a directory.
    ///
    /// Missing or broken files are logged and skipped; the book keeps every
    /// file that loaded.
    pub fn load_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let start = Instant::now();
        let mut book = Self::new();

        for file in BOOK_FILES {
            let path = dir.join(file);
            if !path.is_file() {
                tracing::error!("Can't open opening file: {}", path.display());
                continue;
            }
            if let Err(e) = book.load_file(&path) {
                tracing::error!("Failed to load opening file: {}", e);
            }
        }

        tracing::info!(
            "Loaded {} openings and {} moves in {}ms",
            book.openings,
            book.moves,
            start.elapsed().as_millis()
        );
        book
    }

    /// Adds every record of one database file, returning how many were added.
    ///
    /// Loading stops at the first bad record; records before it stay in the book.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, BookError> {
        let path = path.as_ref();
        let in_file = |source: BookError| BookError::InFile {
            path: path.to_path_buf(),
            source: Box::new(source),
        };

        let text = std::fs::read_to_string(path).map_err(|source| BookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lines = parse_tsv(&text).map_err(in_file)?;
        for line in &lines {
            self.insert(line).map_err(in_file)?;
        }
        tracing::debug!("{}: {} openings", path.display(), lines.len());
        Ok(lines.len())
    }

    /// Replays an opening line and attaches its name where the line ends.
    ///
    /// A later record ending at the same node replaces the name; longer lines
    /// passing through leave it alone.
    pub fn insert(&mut self, line: &OpeningLine) -> Result<(), BookError> {
        let mut position = Position::new();
        let path = line
            .moves
            .iter()
            .map(|token| position.move_san(token))
            .collect::<Result<Vec<String>, SanError>>()
            .map_err(|source| BookError::Move {
                name: line.name.clone(),
                source,
            })?;

        let mut node = &mut self.root;
        for uci in path {
            node = node.branches.entry(uci).or_default();
        }
        node.name = Some(line.name.clone());
        self.openings += 1;
        self.moves += line.moves.len();
        Ok(())
    }

    /// Returns the name of the opening reached by the moves played so far.
    ///
    /// Returns `None` when the moves leave the book or end between named
    /// lines.
    #[must_use]
    pub fn find(&self, position: &Position) -> Option<&str> {
        let mut node = &self.root;
        for m in position.moves() {
            node = node.branches.get(&m.to_uci())?;
        }
        node.name.as_deref()
    }

    /// Number of opening records added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.openings
    }

    /// Returns true if no opening has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.openings == 0
    }

    /// Number of SAN moves replayed while building.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.moves
    }
}

/// Parses one database file.
///
/// The first line is a header and is discarded. Blank lines are skipped.
/// Each row is `<eco>\t<name>\t<moves>` where the moves are PGN-style SAN.
pub fn parse_tsv(text: &str) -> Result<Vec<OpeningLine>, BookError> {
    let mut lines = Vec::new();
    for (index, row) in text.lines().enumerate().skip(1) {
        let row = row.trim_end_matches('\r');
        if row.trim().is_empty() {
            continue;
        }
        let malformed = || BookError::MalformedRow {
            line: index + 1,
            text: row.to_string(),
        };
        let mut fields = row.splitn(3, '\t');
        let (Some(eco), Some(name), Some(pgn)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };
        let line = OpeningLine::from_pgn(eco, name, pgn);
        if line.moves.is_empty() {
            return Err(malformed());
        }
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "eco\tname\tpgn\n";

    fn play(moves: &[&str]) -> Position {
        let mut position = Position::new();
        for text in moves {
            position.make_move_uci(text).unwrap();
        }
        position
    }

    fn sample_book() -> OpeningBook {
        let lines = [
            OpeningLine::from_pgn("B00", "King's Pawn Game", "1. e4"),
            OpeningLine::from_pgn("B20", "Sicilian Defense", "1. e4 c5"),
            OpeningLine::from_pgn("B27", "Sicilian Defense: Hyperaccelerated", "1. e4 c5 2. Nf3 g6"),
            OpeningLine::from_pgn("C20", "King's Pawn Game: Alternative", "1. e4 e5"),
        ];
        OpeningBook::from_lines(&lines).unwrap()
    }

    #[test]
    fn test_empty_book() {
        let book = OpeningBook::new();
        assert!(book.is_empty());
        assert_eq!(book.find(&Position::new()), None);
        assert_eq!(book.find(&play(&["e2e4"])), None);
    }

    #[test]
    fn test_find_named_lines() {
        let book = sample_book();
        assert_eq!(book.len(), 4);
        assert_eq!(book.move_count(), 1 + 2 + 4 + 2);
        assert_eq!(book.find(&play(&["e2e4"])), Some("King's Pawn Game"));
        assert_eq!(book.find(&play(&["e2e4", "c7c5"])), Some("Sicilian Defense"));
        assert_eq!(
            book.find(&play(&["e2e4", "c7c5", "g1f3", "g7g6"])),
            Some("Sicilian Defense: Hyperaccelerated")
        );
    }

    #[test]
    fn test_unnamed_and_unknown_positions() {
        let book = sample_book();
        assert_eq!(book.find(&Position::new()), None);
        assert_eq!(book.find(&play(&["e2e4", "c7c5", "g1f3"])), None);
        assert_eq!(book.find(&play(&["a2a3"])), None);
        assert_eq!(book.find(&play(&["e2e4", "c7c5", "g1f3", "g7g6", "d2d4"])), None);
    }

    #[test]
    fn test_last_name_wins() {
        let lines = [
            OpeningLine::from_pgn("B20", "Sicilian", "1. e4 c5"),
            OpeningLine::from_pgn("B20", "Sicilian Defense", "1. e4 c5"),
            OpeningLine::from_pgn("B27", "Sicilian Defense: Hyperaccelerated", "1. e4 c5 2. Nf3 g6"),
        ];
        let book = OpeningBook::from_lines(&lines).unwrap();
        assert_eq!(book.find(&play(&["e2e4", "c7c5"])), Some("Sicilian Defense"));
        assert_eq!(
            book.find(&play(&["e2e4", "c7c5", "g1f3", "g7g6"])),
            Some("Sicilian Defense: Hyperaccelerated")
        );
    }

    #[test]
    fn test_bad_san_fails() {
        let lines = [OpeningLine::from_pgn("A00", "Broken", "1. e4 Ke3")];
        let err = OpeningBook::from_lines(&lines).unwrap_err();
        assert!(matches!(err, BookError::Move { ref name, .. } if name == "Broken"));
    }

    #[test]
    fn test_parse_tsv() {
        let text = format!(
            "{}A00\tPolish Opening\t1. b4\n\nB20\tSicilian Defense\t1. e4 c5\r\n",
            HEADER
        );
        let lines = parse_tsv(&text).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].eco, "A00");
        assert_eq!(lines[0].moves, ["b4"]);
        assert_eq!(lines[1].name, "Sicilian Defense");
        assert_eq!(lines[1].moves, ["e4", "c5"]);
    }

    #[test]
    fn test_parse_tsv_malformed() {
        let text = format!("{}A00 Polish Opening 1. b4\n", HEADER);
        assert!(matches!(
            parse_tsv(&text),
            Err(BookError::MalformedRow { line: 2, .. })
        ));
        let text = format!("{}A00\tNothing\t\n", HEADER);
        assert!(parse_tsv(&text).is_err());
    }

    #[test]
    fn test_load_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.tsv"),
            format!("{}A00\tPolish Opening\t1. b4\n", HEADER),
        )
        .unwrap();
        fs::write(
            dir.path().join("b.tsv"),
            format!(
                "{}B00\tKing's Pawn Game\t1. e4\nB20\tSicilian Defense\t1. e4 c5\n",
                HEADER
            ),
        )
        .unwrap();
        // c.tsv and d.tsv are missing; e.tsv is broken.
        fs::write(dir.path().join("e.tsv"), format!("{}E00\tBroken\t1. d4 Qxh7\n", HEADER)).unwrap();

        let book = OpeningBook::load_dir(dir.path());
        assert_eq!(book.len(), 3);
        assert_eq!(book.find(&play(&["b2b4"])), Some("Polish Opening"));
        assert_eq!(book.find(&play(&["e2e4", "c7c5"])), Some("Sicilian Defense"));
        assert_eq!(book.find(&play(&["d2d4"])), None);
    }

    #[test]
    fn test_load_file_errors() {
        let dir = TempDir::new().unwrap();
        let mut book = OpeningBook::new();
        assert!(matches!(
            book.load_file(dir.path().join("missing.tsv")),
            Err(BookError::Io { .. })
        ));

        let path = dir.path().join("c.tsv");
        fs::write(&path, format!("{}C00\tFrench Defense\t1. e4 e6\nbad row\n", HEADER)).unwrap();
        let err = book.load_file(&path).unwrap_err();
        assert!(matches!(err, BookError::InFile { .. }));
        assert!(err.to_string().contains("c.tsv"));
        assert!(book.is_empty());
    }

    #[test]
    fn test_book_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OpeningBook>();
    }
}
