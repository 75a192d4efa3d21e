use curate::GameProvenance;
use pgn_reader::{BufferedReader, RawComment, RawHeader, SanPlus, Skip, Visitor};
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, FromSetup, Position};

/// A main-line move with the position it was played from
#[derive(Debug, Clone, PartialEq)]
pub struct MainlineMove {
    /// FEN before the move
    pub fen: String,
    pub san: String,
    pub uci: String,
    pub fullmove_number: u32,
    pub white_to_move: bool,
    /// Every comment following the move, joined by a space
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGame {
    pub provenance: GameProvenance,
    pub moves: Vec<MainlineMove>,
}

impl ParsedGame {
    pub fn commented_moves(&self) -> impl Iterator<Item = &MainlineMove> {
        self.moves.iter().filter(|m| !m.comment.is_empty())
    }
}

/// Walks the first variation at every branch and records the board before each move.
struct MainlineVisitor {
    pos: Chess,
    provenance: GameProvenance,
    moves: Vec<MainlineMove>,
    /// The FEN header could not be set up
    invalid_setup: bool,
    /// An illegal move ended the main line early
    line_ended: bool,
}

/// Pass the turn without moving, advancing the clocks like a real move.
fn play_null(pos: &Chess) -> Option<Chess> {
    let mut setup = pos.clone().into_setup(EnPassantMode::Legal);
    if setup.turn.is_black() {
        setup.fullmoves = setup.fullmoves.saturating_add(1);
    }
    setup.turn = !setup.turn;
    setup.ep_square = None;
    setup.halfmoves = setup.halfmoves.saturating_add(1);

    // Fails when the side passing is in check
    Chess::from_setup(setup, CastlingMode::Standard).ok()
}

impl MainlineVisitor {
    fn new() -> Self {
        Self {
            pos: Chess::default(),
            provenance: GameProvenance::default(),
            moves: Vec::new(),
            invalid_setup: false,
            line_ended: false,
        }
    }

    fn push_null(&mut self) {
        let Some(next) = play_null(&self.pos) else {
            self.line_ended = true;
            return;
        };

        self.moves.push(MainlineMove {
            fen: Fen::from_position(self.pos.clone(), EnPassantMode::Legal).to_string(),
            san: "--".to_string(),
            uci: "0000".to_string(),
            fullmove_number: self.pos.fullmoves().get(),
            white_to_move: self.pos.turn().is_white(),
            comment: String::new(),
        });
        self.pos = next;
    }
}

impl Visitor for MainlineVisitor {
    type Result = Option<ParsedGame>;

    fn begin_game(&mut self) {
        *self = Self::new();
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let text = value.decode_utf8_lossy().into_owned();
        match key {
            b"Event" => self.provenance.event = text,
            b"Annotator" => self.provenance.annotator = text,
            b"Site" => self.provenance.link = text,
            b"FEN" => {
                let setup = Fen::from_ascii(text.trim().as_bytes())
                    .ok()
                    .and_then(|fen| fen.into_position::<Chess>(CastlingMode::Standard).ok());
                match setup {
                    Some(pos) => self.pos = pos,
                    None => self.invalid_setup = true,
                }
            }
            _ => {}
        }
    }

    fn end_headers(&mut self) -> Skip {
        Skip(self.invalid_setup)
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.line_ended {
            return;
        }

        if matches!(san_plus.san, San::Null) {
            self.push_null();
            return;
        }

        let Ok(m) = san_plus.san.to_move(&self.pos) else {
            self.line_ended = true;
            return;
        };

        let fen = Fen::from_position(self.pos.clone(), EnPassantMode::Legal).to_string();
        let uci = m.to_uci(CastlingMode::Standard).to_string();
        let fullmove_number = self.pos.fullmoves().get();
        let white_to_move = self.pos.turn().is_white();
        let san = SanPlus::from_move_and_play_unchecked(&mut self.pos, &m).to_string();

        self.moves.push(MainlineMove {
            fen,
            san,
            uci,
            fullmove_number,
            white_to_move,
            comment: String::new(),
        });
    }

    fn comment(&mut self, comment: RawComment<'_>) {
        if self.line_ended {
            return;
        }
        // A comment before the first move belongs to the game, not a move
        let Some(last) = self.moves.last_mut() else {
            return;
        };

        let text = String::from_utf8_lossy(comment.as_bytes());
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !last.comment.is_empty() {
            last.comment.push(' ');
        }
        last.comment.push_str(text);
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true) // stay in the mainline
    }

    fn end_game(&mut self) -> Self::Result {
        if self.invalid_setup || self.moves.is_empty() {
            return None;
        }

        Some(ParsedGame {
            provenance: std::mem::take(&mut self.provenance),
            moves: std::mem::take(&mut self.moves),
        })
    }
}

/// Parse the first game of a PGN text. `None` when nothing usable was found.
pub fn parse_game(pgn: &str) -> Option<ParsedGame> {
    let mut reader = BufferedReader::new_cursor(pgn.as_bytes());
    let mut visitor = MainlineVisitor::new();

    reader.read_game(&mut visitor).ok().flatten().flatten()
}
