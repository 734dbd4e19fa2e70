/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::lexer::{tokenize, LineIndex, Token};
use crate::ParseError;

fn kinds(source: &str) -> Vec<Token> {
    tokenize(source)
        .expect("lex failed")
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        kinds("let rec letter in inner"),
        vec![Token::Let, Token::Rec, Token::Ident, Token::In, Token::Ident, Token::Eof]
    );
}

#[test]
fn test_multi_char_symbols_win() {
    assert_eq!(
        kinds("a<=b->c<d-e"),
        vec![
            Token::Ident,
            Token::Le,
            Token::Ident,
            Token::Arrow,
            Token::Ident,
            Token::Lt,
            Token::Ident,
            Token::Minus,
            Token::Ident,
            Token::Eof,
        ]
    );
}

#[test]
fn test_spans_and_trailing_eof() {
    let tokens = tokenize("(1, x2)\n").expect("lex failed");
    let spans: Vec<_> = tokens.iter().map(|(_, span)| span.clone()).collect();
    assert_eq!(spans, vec![0..1, 1..2, 2..3, 4..6, 6..7, 8..8]);
}

#[test]
fn test_unknown_character() {
    let err = tokenize("let x = 1 in\nx # 2").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedChar {
            line: 2,
            col: 3,
            ch: '#'
        }
    );
}

#[test]
fn test_line_index_positions() {
    let source = "ab\ncd\n\nef";
    let lines = LineIndex::new(source);
    assert_eq!(lines.position(0), (1, 1));
    assert_eq!(lines.position(1), (1, 2));
    assert_eq!(lines.position(3), (2, 1));
    assert_eq!(lines.position(6), (3, 1));
    assert_eq!(lines.position(8), (4, 2));
    assert_eq!(lines.position(source.len()), (4, 3));
}
