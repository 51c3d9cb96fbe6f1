//! Mini-notation parser.
//!
//! Walks the source one character at a time and builds a [`Node`] tree.
//! Every failure carries the byte offset of the offending character, so a
//! live editor can point straight at the mistake. Whatever parses here
//! compiles; nothing is deferred to query time.

use super::ast::Node;
use crate::error::{PatternError, Result};

/// Parse a full mini-notation string into an AST.
pub fn parse(src: &str) -> Result<Node> {
    let mut p = Parser::new(src);
    let node = p.parse_pattern(None)?;
    p.skip_ws();
    if let Some(c) = p.peek() {
        return Err(p.err(format!("unexpected character '{}'", c)));
    }
    Ok(node)
}

struct Parser<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn byte_pos(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(i, _)| i)
            .unwrap_or(self.src.len())
    }

    fn err(&self, message: impl Into<String>) -> PatternError {
        PatternError::parse(self.byte_pos(), message)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, wanted: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.err(format!("expected '{}', found '{}'", wanted, c))),
            None => Err(self.err(format!("expected '{}', found end of pattern", wanted))),
        }
    }

    /// Stack level: `choice (',' choice)*`.
    fn parse_pattern(&mut self, terminator: Option<char>) -> Result<Node> {
        let mut layers = vec![self.parse_choice(terminator)?];
        loop {
            self.skip_ws();
            if self.peek() == Some(',') {
                self.pos += 1;
                layers.push(self.parse_choice(terminator)?);
            } else {
                break;
            }
        }
        Ok(if layers.len() == 1 {
            layers.remove(0)
        } else {
            Node::Stack(layers)
        })
    }

    /// Choice level: `sequence ('|' sequence)*`.
    fn parse_choice(&mut self, terminator: Option<char>) -> Result<Node> {
        let mut options = vec![self.parse_sequence(terminator)?];
        loop {
            self.skip_ws();
            if self.peek() == Some('|') {
                self.pos += 1;
                options.push(self.parse_sequence(terminator)?);
            } else {
                break;
            }
        }
        Ok(if options.len() == 1 {
            options.remove(0)
        } else {
            Node::RandomChoice(options)
        })
    }

    fn parse_sequence(&mut self, terminator: Option<char>) -> Result<Node> {
        let mut steps = self.parse_steps(terminator)?;
        Ok(if steps.len() == 1 {
            steps.remove(0)
        } else {
            Node::Sequence(steps)
        })
    }

    /// A run of whitespace-separated steps, stopping at the terminator or a
    /// `,` / `|` separator. Rejects empty runs.
    fn parse_steps(&mut self, terminator: Option<char>) -> Result<Vec<Node>> {
        let mut steps: Vec<Node> = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(c) if Some(c) == terminator || c == ',' || c == '|' => break,
                Some('!') => {
                    let prev = steps
                        .last()
                        .cloned()
                        .ok_or_else(|| self.err("'!' requires a preceding step"))?;
                    self.pos += 1;
                    steps.push(prev);
                }
                _ => steps.push(self.parse_step()?),
            }
        }
        if steps.is_empty() {
            return Err(self.err("empty pattern"));
        }
        Ok(steps)
    }

    fn parse_step(&mut self) -> Result<Node> {
        let node = match self.peek() {
            Some('~') => {
                self.pos += 1;
                Node::Rest
            }
            Some('[') => {
                self.pos += 1;
                let inner = self.parse_pattern(Some(']'))?;
                self.expect(']')?;
                match inner {
                    Node::Sequence(children) => Node::FastGroup(children),
                    other => Node::FastGroup(vec![other]),
                }
            }
            Some('<') => {
                self.pos += 1;
                let children = self.parse_steps(Some('>'))?;
                self.expect('>')?;
                Node::Alternation(children)
            }
            Some(c) if is_word_char(c) => Node::Atom(self.take_word()),
            Some(c) => return Err(self.err(format!("unexpected character '{}'", c))),
            None => return Err(self.err("unexpected end of pattern")),
        };
        self.parse_suffixes(node)
    }

    /// Suffixes attach without whitespace: `(k,n[,r])` then `*n`, in any
    /// combination, e.g. `bd(3,8)*2`.
    fn parse_suffixes(&mut self, mut node: Node) -> Result<Node> {
        loop {
            match self.peek() {
                Some('(') => {
                    let at = self.byte_pos();
                    self.pos += 1;
                    self.skip_ws();
                    let pulses = self.parse_usize("euclidean pulses")?;
                    self.skip_ws();
                    self.expect(',')?;
                    self.skip_ws();
                    let steps = self.parse_usize("euclidean steps")?;
                    self.skip_ws();
                    let rotation = if self.peek() == Some(',') {
                        self.pos += 1;
                        self.skip_ws();
                        let r = self.parse_usize("euclidean rotation")?;
                        self.skip_ws();
                        r
                    } else {
                        0
                    };
                    self.expect(')')?;
                    if steps == 0 || pulses > steps {
                        return Err(PatternError::parse(
                            at,
                            format!("invalid euclidean rhythm: ({},{})", pulses, steps),
                        ));
                    }
                    node = Node::Euclid {
                        child: Box::new(node),
                        pulses,
                        steps,
                        rotation,
                    };
                }
                Some('*') => {
                    self.pos += 1;
                    let count = self.parse_usize("repeat count")?;
                    if count == 0 {
                        return Err(self.err("repeat count must be positive"));
                    }
                    node = Node::Repeat {
                        child: Box::new(node),
                        count,
                    };
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn take_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if is_word_char(c) {
                word.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        word
    }

    fn parse_usize(&mut self, what: &str) -> Result<usize> {
        let at = self.byte_pos();
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.pos += 1;
        }
        if digits.is_empty() {
            return Err(self.err(format!("expected number for {}", what)));
        }
        digits
            .parse::<usize>()
            .map_err(|_| PatternError::parse(at, format!("invalid integer for {}", what)))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '#' | '_' | '.' | '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence() {
        let ast = parse("bd sn hh hh").unwrap();
        match ast {
            Node::Sequence(steps) => {
                assert_eq!(steps.len(), 4);
                assert_eq!(steps[0], Node::Atom("bd".to_string()));
            }
            other => panic!("expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rest_and_group() {
        let ast = parse("bd ~ [sn sn]").unwrap();
        match ast {
            Node::Sequence(steps) => {
                assert_eq!(steps[1], Node::Rest);
                assert!(matches!(&steps[2], Node::FastGroup(inner) if inner.len() == 2));
            }
            other => panic!("expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_alternation() {
        let ast = parse("<bd sn> hh").unwrap();
        match ast {
            Node::Sequence(steps) => {
                assert!(matches!(&steps[0], Node::Alternation(inner) if inner.len() == 2));
            }
            other => panic!("expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_euclid_suffix() {
        let ast = parse("bd(3,8)").unwrap();
        assert_eq!(
            ast,
            Node::Euclid {
                child: Box::new(Node::Atom("bd".to_string())),
                pulses: 3,
                steps: 8,
                rotation: 0,
            }
        );
        let rotated = parse("bd(3,8,2)").unwrap();
        assert!(matches!(rotated, Node::Euclid { rotation: 2, .. }));
    }

    #[test]
    fn test_parse_repeat_and_duplicate() {
        let ast = parse("bd*2 sn !").unwrap();
        match ast {
            Node::Sequence(steps) => {
                assert!(matches!(&steps[0], Node::Repeat { count: 2, .. }));
                assert_eq!(steps[1], steps[2]); // '!' clones the previous step
            }
            other => panic!("expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_stack_and_choice() {
        assert!(matches!(
            parse("bd sn, hh hh hh").unwrap(),
            Node::Stack(layers) if layers.len() == 2
        ));
        assert!(matches!(
            parse("bd | sn | hh").unwrap(),
            Node::RandomChoice(options) if options.len() == 3
        ));
    }

    #[test]
    fn test_parse_errors_carry_position() {
        match parse("bd [sn") {
            Err(PatternError::Parse { position, .. }) => assert_eq!(position, 6),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(parse("bd )").is_err());
        assert!(parse("").is_err());
        assert!(parse("! bd").is_err());
        assert!(parse("bd*").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_euclid() {
        match parse("bd(9,4)") {
            Err(PatternError::Parse { position, message }) => {
                assert_eq!(position, 2);
                assert!(message.contains("(9,4)"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(parse("bd(1,0)").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for src in ["bd sn hh", "bd(3,8) ~", "<bd sn>*2", "bd, sn | hh"] {
            let ast = parse(src).unwrap();
            let printed = format!("{}", ast);
            assert_eq!(parse(&printed).unwrap(), ast);
        }
    }
}
