//! Line arithmetic: evaluating operators and reducing a single row or column.
//!
//! Every slide is built from the same per-line pipeline: drop blanks, merge
//! runs of identical operators, evaluate `number operator number` triples in
//! one pass toward the direction of travel, then pad back to width with blanks
//! on the far side.

use smallvec::SmallVec;

use crate::*;

/// Buffer for one row or column; grids are small enough to stay inline.
pub type Line = SmallVec<[Tile; 8]>;

/// Evaluates `a op b`, provided `op` is enabled for the game.
pub fn evaluate(a: i64, op: Operator, b: i64, enabled: OperatorSet) -> Result<i64> {
    if !enabled.enables(op) {
        return Err(GameError::UnsupportedOperator(op));
    }

    Ok(match op {
        Operator::Addition => a.saturating_add(b),
        Operator::Subtraction => a.saturating_sub(b),
        Operator::Multiplication => a.saturating_mul(b),
    })
}

pub fn remove_blanks(line: &[Tile]) -> Line {
    line.iter().copied().filter(|tile| !tile.is_blank()).collect()
}

/// Collapses every run of two or more identical enabled operators into one.
pub fn collapse_operator_runs(line: &[Tile], enabled: OperatorSet) -> Line {
    let mut result = Line::new();

    for &tile in line {
        let repeats_previous = match (tile, result.last()) {
            (Tile::Operator(op), Some(&Tile::Operator(previous))) => {
                op == previous && enabled.enables(op)
            }
            _ => false,
        };
        if !repeats_previous {
            result.push(tile);
        }
    }

    result
}

/// Matches `Number(a), Operator(op), Number(b)`.
fn as_triple(window: &[Tile]) -> Option<(i64, Operator, i64)> {
    match *window {
        [Tile::Number(a), Tile::Operator(op), Tile::Number(b)] => Some((a, op, b)),
        _ => None,
    }
}

/// Single left-to-right pass evaluating triples; produced values are not
/// re-examined within the same pass.
pub fn collapse_left(line: &[Tile], enabled: OperatorSet) -> Result<Line> {
    let compacted = collapse_operator_runs(line, enabled);
    let mut result = Line::new();
    let mut cursor = 0;

    while cursor < compacted.len() {
        match compacted.get(cursor..cursor + 3).and_then(as_triple) {
            Some((a, op, b)) => {
                result.push(Tile::Number(evaluate(a, op, b, enabled)?));
                cursor += 3;
            }
            None => {
                result.push(compacted[cursor]);
                cursor += 1;
            }
        }
    }

    Ok(result)
}

/// Single right-to-left pass, merging the rightmost eligible triple first.
pub fn collapse_right(line: &[Tile], enabled: OperatorSet) -> Result<Line> {
    let compacted = collapse_operator_runs(line, enabled);
    let mut result = Line::new();
    // one past the rightmost unvisited tile
    let mut end = compacted.len();

    while end > 0 {
        let triple = end
            .checked_sub(3)
            .and_then(|start| as_triple(&compacted[start..end]));
        match triple {
            Some((a, op, b)) => {
                result.push(Tile::Number(evaluate(a, op, b, enabled)?));
                end -= 3;
            }
            None => {
                result.push(compacted[end - 1]);
                end -= 1;
            }
        }
    }

    result.reverse();
    Ok(result)
}

/// Pads `line` with blanks on `side` until it is `target_length` long.
pub fn pad(mut line: Line, target_length: usize, side: Side) -> Line {
    let missing = target_length.saturating_sub(line.len());
    match side {
        Side::Trailing => line.extend(core::iter::repeat_n(Tile::Blank, missing)),
        Side::Leading => {
            line.insert_many(0, core::iter::repeat_n(Tile::Blank, missing));
        }
    }
    line
}

/// The full per-line slide for tiles travelling toward `toward`.
pub fn reduce_line(line: &[Tile], toward: Side, enabled: OperatorSet) -> Result<Line> {
    let compact = remove_blanks(line);
    let collapsed = match toward {
        Side::Leading => collapse_left(&compact, enabled)?,
        Side::Trailing => collapse_right(&compact, enabled)?,
    };
    log::trace!("Reduced {:?} toward {:?} into {:?}", line, toward, collapsed);
    Ok(pad(collapsed, line.len(), toward.opposite()))
}
