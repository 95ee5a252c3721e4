use super::error::ParseError;
use super::lexer::{Lexer, Token, TokenKind};
use super::message::{FieldValue, Scalar, TextMessage};

/// 子消息最多嵌套的层数
pub const MAX_DEPTH: usize = 100;

/// 把prototxt文本解析为字段树
pub fn parse(input: &str) -> Result<TextMessage, ParseError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    parser.message(None)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    /// 文件末尾的位置（用于"意外结束"类错误）
    fn end_position(&self) -> (usize, usize) {
        self.tokens
            .last()
            .map_or((1, 1), |t| (t.line, t.column))
    }

    /// 解析`open`之后的子消息，直到`closing`为止
    fn nested(&mut self, open: &Token, closing: TokenKind) -> Result<TextMessage, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(
                open.line,
                open.column,
                format!("消息嵌套超过{MAX_DEPTH}层"),
            ));
        }
        self.depth += 1;
        let msg = self.message(Some(closing));
        self.depth -= 1;
        msg
    }

    fn message(&mut self, closing: Option<TokenKind>) -> Result<TextMessage, ParseError> {
        let mut msg = TextMessage::new();
        loop {
            let Some(token) = self.next() else {
                return match closing {
                    None => Ok(msg),
                    Some(_) => {
                        let (line, column) = self.end_position();
                        Err(ParseError::new(line, column, "消息缺少结尾的括号"))
                    }
                };
            };

            if closing.as_ref() == Some(&token.kind) {
                return Ok(msg);
            }

            let name = match token.kind {
                TokenKind::Ident(name) => name,
                other => {
                    return Err(ParseError::new(
                        token.line,
                        token.column,
                        format!("期望字段名，实际为{other:?}"),
                    ));
                }
            };

            let has_colon = self.peek_is(&TokenKind::Colon);
            if has_colon {
                self.next();
            }
            self.field(&mut msg, name, has_colon)?;

            if self.peek_is(&TokenKind::Comma) || self.peek_is(&TokenKind::Semicolon) {
                self.next();
            }
        }
    }

    fn field(&mut self, msg: &mut TextMessage, name: String, has_colon: bool) -> Result<(), ParseError> {
        let Some(token) = self.next() else {
            let (line, column) = self.end_position();
            return Err(ParseError::new(line, column, format!("字段`{name}`缺少取值")));
        };

        match token.kind {
            TokenKind::LBrace => msg.push(name, self.nested(&token, TokenKind::RBrace)?),
            TokenKind::LAngle => msg.push(name, self.nested(&token, TokenKind::RAngle)?),
            TokenKind::LBracket if has_colon => self.list(msg, &name)?,
            _ if !has_colon => {
                return Err(ParseError::new(
                    token.line,
                    token.column,
                    format!("标量字段`{name}`后缺少`:`"),
                ));
            }
            _ => {
                let value = self.scalar(token)?;
                msg.push(name, value);
            }
        }
        Ok(())
    }

    /// `field: [a, b, c]`，等价于重复书写同名字段
    fn list(&mut self, msg: &mut TextMessage, name: &str) -> Result<(), ParseError> {
        if self.peek_is(&TokenKind::RBracket) {
            self.next();
            return Ok(());
        }
        loop {
            let Some(token) = self.next() else {
                let (line, column) = self.end_position();
                return Err(ParseError::new(line, column, "列表缺少结尾的`]`"));
            };
            let value = match token.kind {
                TokenKind::LBrace => FieldValue::Message(self.nested(&token, TokenKind::RBrace)?),
                TokenKind::LAngle => FieldValue::Message(self.nested(&token, TokenKind::RAngle)?),
                _ => FieldValue::Scalar(self.scalar(token)?),
            };
            msg.push(name, value);

            match self.next() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => continue,
                Some(Token {
                    kind: TokenKind::RBracket,
                    ..
                }) => return Ok(()),
                Some(t) => {
                    return Err(ParseError::new(t.line, t.column, "列表元素之间需要`,`"));
                }
                None => {
                    let (line, column) = self.end_position();
                    return Err(ParseError::new(line, column, "列表缺少结尾的`]`"));
                }
            }
        }
    }

    fn scalar(&mut self, token: Token) -> Result<Scalar, ParseError> {
        match token.kind {
            TokenKind::Str(mut s) => {
                // 相邻的字符串字面量自动拼接
                while let Some(Token {
                    kind: TokenKind::Str(next),
                    ..
                }) = self.peek()
                {
                    s.push_str(next);
                    self.pos += 1;
                }
                Ok(Scalar::Str(s))
            }
            TokenKind::Ident(s) => Ok(Scalar::Ident(s)),
            TokenKind::Number(text) => parse_number(&text)
                .ok_or_else(|| ParseError::new(token.line, token.column, format!("无效的数字`{text}`"))),
            other => Err(ParseError::new(
                token.line,
                token.column,
                format!("期望标量值，实际为{other:?}"),
            )),
        }
    }
}

fn parse_number(text: &str) -> Option<Scalar> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        let value = i64::from_str_radix(hex, 16).ok()?;
        return Some(Scalar::Int(if negative { -value } else { value }));
    }

    let is_float = digits.contains(['.', 'e', 'E']) || digits.ends_with(['f', 'F']);
    if is_float {
        let trimmed = text.trim_end_matches(['f', 'F']);
        trimmed.parse::<f64>().ok().map(Scalar::Float)
    } else {
        // 超出i64范围的整数字面量按浮点数读入（浮点字段可以写成整数）
        text.parse::<i64>()
            .ok()
            .map(Scalar::Int)
            .or_else(|| text.parse::<f64>().ok().map(Scalar::Float))
    }
}
