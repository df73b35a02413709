//! Greedy line breaking.

use super::cursor::EPS;
use super::TextMeasurer;
use crate::error::{Error, Result};
use crate::model::FontFace;
use crate::parser::InlineSpan;

/// Break `text` into lines no wider than `max_width`.
///
/// Words wider than the column are split across lines character by
/// character. A single character wider than the column is a configuration
/// error.
pub fn wrap_words(
    measurer: &dyn TextMeasurer,
    text: &str,
    face: FontFace,
    size: f32,
    max_width: f32,
) -> Result<Vec<String>> {
    let space = measurer.space_width(face, size)?;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        for piece in fit_word(measurer, word, face, size, max_width)? {
            let width = measurer.measure(&piece, face, size)?;
            if current.is_empty() {
                current = piece;
                current_width = width;
            } else if current_width + space + width <= max_width + EPS {
                current.push(' ');
                current.push_str(&piece);
                current_width += space + width;
            } else {
                lines.push(std::mem::take(&mut current));
                current = piece;
                current_width = width;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

/// Split a word into pieces that each fit `max_width`.
fn fit_word(
    measurer: &dyn TextMeasurer,
    word: &str,
    face: FontFace,
    size: f32,
    max_width: f32,
) -> Result<Vec<String>> {
    if measurer.measure(word, face, size)? <= max_width + EPS {
        return Ok(vec![word.to_string()]);
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        let mut candidate = piece.clone();
        candidate.push(c);
        if measurer.measure(&candidate, face, size)? <= max_width + EPS {
            piece = candidate;
            continue;
        }
        if piece.is_empty() {
            return Err(Error::Config(format!(
                "character '{}' at {}pt is wider than the {:.1}pt column",
                c, size, max_width
            )));
        }
        pieces.push(std::mem::replace(&mut piece, c.to_string()));
        if measurer.measure(&piece, face, size)? > max_width + EPS {
            return Err(Error::Config(format!(
                "character '{}' at {}pt is wider than the {:.1}pt column",
                c, size, max_width
            )));
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }

    log::debug!("Hard-broke a {}-character word into {} pieces", word.chars().count(), pieces.len());
    Ok(pieces)
}

/// Extra space per gap that stretches `line` to `max_width`.
///
/// Zero for lines without gaps or lines already at full width.
pub fn justify_spacing(
    measurer: &dyn TextMeasurer,
    line: &str,
    face: FontFace,
    size: f32,
    max_width: f32,
) -> Result<f32> {
    let gaps = line.matches(' ').count();
    if gaps == 0 {
        return Ok(0.0);
    }
    let width = measurer.measure(line, face, size)?;
    Ok(((max_width - width) / gaps as f32).max(0.0))
}

/// Same-face piece of a styled line.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Text to draw
    pub text: String,
    /// Face of the whole fragment
    pub face: FontFace,
    /// Distance from the start of the line
    pub offset: f32,
}

struct Token {
    text: String,
    face: FontFace,
    width: f32,
    glued: bool,
}

/// Break styled spans into lines of same-face fragments.
///
/// Emphasized spans use the bold face, everything else the regular one.
pub fn wrap_spans(
    measurer: &dyn TextMeasurer,
    spans: &[InlineSpan],
    size: f32,
    max_width: f32,
) -> Result<Vec<Vec<Fragment>>> {
    let space = measurer.space_width(FontFace::Regular, size)?;
    let words = glue_words(tokenize(measurer, spans, size, max_width)?);

    // greedy fill by visual word, remembering which tokens follow a space
    let mut lines: Vec<Vec<(Token, bool)>> = Vec::new();
    let mut line: Vec<(Token, bool)> = Vec::new();
    let mut width = 0.0;
    for word in words {
        let word_width: f32 = word.iter().map(|t| t.width).sum();
        if !line.is_empty() && width + space + word_width <= max_width + EPS {
            width += space + word_width;
            push_word(&mut line, word, true);
        } else if word_width <= max_width + EPS {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            width = word_width;
            push_word(&mut line, word, false);
        } else {
            // wider than the column: break between its glued pieces
            for (k, token) in word.into_iter().enumerate() {
                let gap = k == 0 && !line.is_empty();
                let extra = token.width + if gap { space } else { 0.0 };
                if !line.is_empty() && width + extra > max_width + EPS {
                    lines.push(std::mem::take(&mut line));
                    width = token.width;
                    line.push((token, false));
                } else {
                    width += extra;
                    line.push((token, gap));
                }
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }

    Ok(lines
        .into_iter()
        .map(|tokens| {
            let mut fragments: Vec<Fragment> = Vec::new();
            let mut offset = 0.0;
            for (token, gap) in tokens {
                if gap {
                    offset += space;
                }
                match fragments.last_mut() {
                    Some(last) if last.face == token.face => {
                        if gap {
                            last.text.push(' ');
                        }
                        last.text.push_str(&token.text);
                    }
                    _ => fragments.push(Fragment {
                        text: token.text,
                        face: token.face,
                        offset,
                    }),
                }
                offset += token.width;
            }
            fragments
        })
        .collect())
}

/// Group tokens written without a space between them into one word.
fn glue_words(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut words: Vec<Vec<Token>> = Vec::new();
    for token in tokens {
        match words.last_mut() {
            Some(word) if token.glued => word.push(token),
            _ => words.push(vec![token]),
        }
    }
    words
}

fn push_word(line: &mut Vec<(Token, bool)>, word: Vec<Token>, gap: bool) {
    for (k, token) in word.into_iter().enumerate() {
        line.push((token, gap && k == 0));
    }
}

fn tokenize(
    measurer: &dyn TextMeasurer,
    spans: &[InlineSpan],
    size: f32,
    max_width: f32,
) -> Result<Vec<Token>> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut pending_space = false;

    for span in spans {
        let face = if span.emphasized {
            FontFace::Bold
        } else {
            FontFace::Regular
        };
        let starts_with_space = span.text.starts_with(char::is_whitespace);

        let mut any = false;
        for (i, word) in span.text.split_whitespace().enumerate() {
            let glued = i == 0 && !tokens.is_empty() && !starts_with_space && !pending_space;
            for (j, piece) in fit_word(measurer, word, face, size, max_width)?
                .into_iter()
                .enumerate()
            {
                let width = measurer.measure(&piece, face, size)?;
                tokens.push(Token {
                    text: piece,
                    face,
                    width,
                    glued: glued && j == 0,
                });
            }
            any = true;
        }

        if any {
            pending_space = span.text.ends_with(char::is_whitespace);
        } else if !span.text.is_empty() {
            pending_space = true;
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StandardFontMetrics;

    /// Every character is 10pt wide at any size.
    struct Fixed;

    impl TextMeasurer for Fixed {
        fn measure(&self, text: &str, _face: FontFace, _size: f32) -> Result<f32> {
            Ok(text.chars().count() as f32 * 10.0)
        }
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap_words(&Fixed, "aa bb cc dd", FontFace::Regular, 10.0, 50.0).unwrap();
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn test_wrap_empty() {
        let lines = wrap_words(&Fixed, "   ", FontFace::Regular, 10.0, 50.0).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_hard_break_long_word() {
        let lines = wrap_words(&Fixed, "x abcdefghij y", FontFace::Regular, 10.0, 40.0).unwrap();
        assert_eq!(lines, vec!["x", "abcd", "efgh", "ij y"]);
    }

    #[test]
    fn test_glyph_wider_than_column() {
        let err = wrap_words(&Fixed, "a", FontFace::Regular, 10.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_justify_spacing() {
        let spacing = justify_spacing(&Fixed, "aa bb", FontFace::Regular, 10.0, 70.0).unwrap();
        assert!((spacing - 20.0).abs() < 1e-4);
        assert_eq!(justify_spacing(&Fixed, "single", FontFace::Regular, 10.0, 70.0).unwrap(), 0.0);
    }

    #[test]
    fn test_real_metrics_lines_fit() {
        let metrics = StandardFontMetrics::new();
        let text = "Layout engines measure every word before placing it on the page so that lines never overflow.";
        for line in wrap_words(&metrics, text, FontFace::Regular, 11.0, 200.0).unwrap() {
            assert!(metrics.measure(&line, FontFace::Regular, 11.0).unwrap() <= 200.0 + EPS);
        }
    }

    #[test]
    fn test_wrap_spans_fragments() {
        let spans = vec![
            InlineSpan::plain("ab "),
            InlineSpan::emphasized("cd ef"),
            InlineSpan::plain(" gh"),
        ];
        let lines = wrap_spans(&Fixed, &spans, 10.0, 1000.0).unwrap();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.len(), 3);
        assert_eq!(line[0].text, "ab");
        assert_eq!(line[1].text, "cd ef");
        assert_eq!(line[1].face, FontFace::Bold);
        assert_eq!(line[1].offset, 30.0);
        assert_eq!(line[2].text, "gh");
        assert_eq!(line[2].offset, 90.0);
    }

    #[test]
    fn test_wrap_spans_glued_words() {
        let spans = vec![InlineSpan::emphasized("bold"), InlineSpan::plain("tail more")];
        let lines = wrap_spans(&Fixed, &spans, 10.0, 1000.0).unwrap();
        assert_eq!(lines[0][1].text, "tail more");
        assert_eq!(lines[0][1].offset, 40.0);
    }

    #[test]
    fn test_wrap_spans_keeps_glued_word_together() {
        let spans = vec![
            InlineSpan::plain("aaa "),
            InlineSpan::emphasized("bold"),
            InlineSpan::plain("tail"),
        ];
        let lines = wrap_spans(&Fixed, &spans, 10.0, 80.0).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 1);
        assert_eq!(lines[0][0].text, "aaa");
        assert_eq!(lines[1][0].text, "bold");
        assert_eq!(lines[1][0].offset, 0.0);
        assert_eq!(lines[1][1].text, "tail");
        assert_eq!(lines[1][1].offset, 40.0);
    }

    #[test]
    fn test_wrap_spans_oversized_glued_word_breaks() {
        let spans = vec![InlineSpan::emphasized("abcd"), InlineSpan::plain("efgh")];
        let lines = wrap_spans(&Fixed, &spans, 10.0, 50.0).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text, "abcd");
        assert_eq!(lines[1][0].text, "efgh");
        assert_eq!(lines[1][0].offset, 0.0);
    }

    #[test]
    fn test_wrap_spans_breaks_lines() {
        let spans = vec![InlineSpan::plain("aa bb "), InlineSpan::emphasized("cc dd")];
        let lines = wrap_spans(&Fixed, &spans, 10.0, 50.0).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text, "aa bb");
        assert_eq!(lines[1][0].text, "cc dd");
        assert_eq!(lines[1][0].offset, 0.0);
    }
}
