use super::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum TokenKind {
    Ident(String),
    // 保留原始文本，由解析器决定是整数还是浮点数
    Number(String),
    Str(String),
    Colon,
    LBrace,
    RBrace,
    LAngle,
    RAngle,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

pub(super) struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace_and_comments();
        let (line, column) = (self.line, self.column);
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            ':' => self.punct(TokenKind::Colon),
            '{' => self.punct(TokenKind::LBrace),
            '}' => self.punct(TokenKind::RBrace),
            '<' => self.punct(TokenKind::LAngle),
            '>' => self.punct(TokenKind::RAngle),
            '[' => self.punct(TokenKind::LBracket),
            ']' => self.punct(TokenKind::RBracket),
            ',' => self.punct(TokenKind::Comma),
            ';' => self.punct(TokenKind::Semicolon),
            '"' | '\'' => TokenKind::Str(self.string(c)?),
            '-' | '+' => {
                self.bump();
                match self.peek() {
                    Some(n) if n.is_ascii_digit() || n == '.' => {
                        let number = self.number();
                        if c == '-' {
                            TokenKind::Number(format!("-{number}"))
                        } else {
                            TokenKind::Number(number)
                        }
                    }
                    // `-inf`之类
                    Some(n) if n.is_alphabetic() => {
                        let ident = self.ident();
                        if c == '-' {
                            TokenKind::Ident(format!("-{ident}"))
                        } else {
                            TokenKind::Ident(ident)
                        }
                    }
                    _ => {
                        return Err(ParseError::new(line, column, format!("孤立的符号`{c}`")));
                    }
                }
            }
            c if c.is_ascii_digit() => TokenKind::Number(self.number()),
            '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                TokenKind::Number(self.number())
            }
            c if c.is_alphabetic() || c == '_' => TokenKind::Ident(self.ident()),
            other => {
                return Err(ParseError::new(line, column, format!("无法识别的字符`{other}`")));
            }
        };

        Ok(Some(Token { kind, line, column }))
    }

    fn punct(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn ident(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn number(&mut self) -> String {
        let mut s = String::new();
        let is_hex = self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X'));
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && !is_hex
                && s.ends_with(|p: char| p == 'e' || p == 'E');
            if c.is_ascii_alphanumeric() || c == '.' || exponent_sign {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn string(&mut self, quote: char) -> Result<String, ParseError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        let mut bytes = Vec::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(ParseError::new(line, column, "字符串缺少结尾引号"));
            };
            match c {
                c if c == quote => break,
                '\n' => return Err(ParseError::new(line, column, "字符串不能跨行")),
                '\\' => self.escape(&mut bytes, line, column)?,
                c => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        String::from_utf8(bytes)
            .map_err(|_| ParseError::new(line, column, "字符串不是合法的UTF-8"))
    }

    fn escape(&mut self, bytes: &mut Vec<u8>, line: usize, column: usize) -> Result<(), ParseError> {
        let Some(c) = self.bump() else {
            return Err(ParseError::new(line, column, "字符串缺少结尾引号"));
        };
        match c {
            'n' => bytes.push(b'\n'),
            't' => bytes.push(b'\t'),
            'r' => bytes.push(b'\r'),
            'a' => bytes.push(0x07),
            'b' => bytes.push(0x08),
            'f' => bytes.push(0x0c),
            'v' => bytes.push(0x0b),
            '\\' => bytes.push(b'\\'),
            '\'' => bytes.push(b'\''),
            '"' => bytes.push(b'"'),
            '?' => bytes.push(b'?'),
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                let byte = u8::try_from(value)
                    .map_err(|_| ParseError::new(line, column, "八进制转义超出范围"))?;
                bytes.push(byte);
            }
            'x' => {
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match self.peek().and_then(|d| d.to_digit(16)) {
                        Some(d) => {
                            value = value * 16 + d;
                            self.bump();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    return Err(ParseError::new(line, column, "`\\x`后缺少十六进制数字"));
                }
                bytes.push(value as u8);
            }
            other => {
                return Err(ParseError::new(
                    line,
                    column,
                    format!("无法识别的转义字符`\\{other}`"),
                ));
            }
        }
        Ok(())
    }
}
