//! Property tests for the move-quality classifier.

use chess::{Color, Piece, Square};
use proptest::prelude::*;

use move_insight::{MoveAssessment, MoveFlags, MoveQuality, MoveRecord};

fn record(
    color: Color,
    piece: Piece,
    captured: Option<Piece>,
    eval_change: Option<f64>,
) -> MoveRecord {
    MoveRecord {
        move_number: 1,
        color,
        san: "m".to_string(),
        piece,
        captured,
        from: Square::A1,
        to: Square::B2,
        flags: MoveFlags {
            capture: captured.is_some(),
            ..MoveFlags::default()
        },
        fen_after: String::new(),
        prev_eval: 0.0,
        new_eval: 0.0,
        eval_change,
        time_seconds: 0.0,
    }
}

fn any_piece() -> impl Strategy<Value = Piece> {
    prop::sample::select(vec![
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ])
}

fn capturable_piece() -> impl Strategy<Value = Piece> {
    prop::sample::select(vec![
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ])
}

fn any_color() -> impl Strategy<Value = Color> {
    prop::sample::select(vec![Color::White, Color::Black])
}

fn exchange_value(piece: Piece) -> i32 {
    move_insight::quality::exchange_value(piece)
}

proptest! {
    // `badly_losing_captures_are_never_praised` accepts only 3 of the 30
    // possible (mover, captured) pairs, so the default global-reject budget
    // of 1024 runs out before 256 cases pass the `prop_assume!`.
    #![proptest_config(ProptestConfig {
        max_global_rejects: 16384,
        ..ProptestConfig::default()
    })]

    #[test]
    fn accuracy_is_always_in_range(
        color in any_color(),
        piece in any_piece(),
        captured in prop::option::of(capturable_piece()),
        eval_change in prop::option::of(-50.0f64..50.0),
        is_book in any::<bool>(),
    ) {
        let assessment =
            MoveAssessment::classify(&record(color, piece, captured, eval_change), is_book);
        prop_assert!((0.0..=100.0).contains(&assessment.accuracy));
    }

    #[test]
    fn winning_captures_are_never_errors(
        mover in any_piece(),
        captured in capturable_piece(),
        eval_change in -50.0f64..50.0,
    ) {
        prop_assume!(exchange_value(captured) > exchange_value(mover));
        let assessment =
            MoveAssessment::classify(&record(Color::White, mover, Some(captured), Some(eval_change)), false);
        prop_assert!(
            !matches!(assessment.quality, MoveQuality::Mistake | MoveQuality::Blunder),
            "{:?}x{:?} at {eval_change} was {:?}",
            mover,
            captured,
            assessment.quality
        );
    }

    #[test]
    fn badly_losing_captures_are_never_praised(
        mover in any_piece(),
        captured in capturable_piece(),
        eval_change in -50.0f64..-0.5,
    ) {
        prop_assume!(exchange_value(captured) - exchange_value(mover) < -5);
        let assessment =
            MoveAssessment::classify(&record(Color::White, mover, Some(captured), Some(eval_change)), false);
        prop_assert!(
            matches!(assessment.quality, MoveQuality::Mistake | MoveQuality::Blunder),
            "losing capture at {eval_change} was {:?}",
            assessment.quality
        );
    }

    #[test]
    fn quiet_accuracy_is_monotone_in_eval_change(
        lower in -10.0f64..10.0,
        delta in 0.0f64..10.0,
    ) {
        let a = MoveAssessment::classify(&record(Color::White, Piece::Knight, None, Some(lower)), false);
        let b =
            MoveAssessment::classify(&record(Color::White, Piece::Knight, None, Some(lower + delta)), false);
        prop_assert!(b.accuracy >= a.accuracy);
    }

    #[test]
    fn checkmate_always_wins_the_argument(
        color in any_color(),
        eval_change in prop::option::of(-50.0f64..50.0),
    ) {
        let mut rec = record(color, Piece::Queen, None, eval_change);
        rec.flags.checkmate = true;
        let assessment = MoveAssessment::classify(&rec, false);
        prop_assert_eq!(assessment.quality, MoveQuality::Brilliant);
        prop_assert_eq!(assessment.accuracy, 100.0);
    }
}
