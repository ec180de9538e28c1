/// SQL keywords, operators and punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Statements
    SELECT,
    INSERT,
    UPDATE,
    DELETE,
    // Clauses
    DISTINCT,
    FROM,
    INTO,
    VALUES,
    SET,
    WHERE,
    INNER,
    LEFT,
    JOIN,
    ON,
    GROUP,
    ORDER,
    BY,
    ASC,
    DESC,
    LIMIT,
    OFFSET,
    // Predicates
    AND,
    OR,
    NOT,
    IS,
    NULL,
    LIKE,
    // Operators
    EQ,
    LT,
    GT,
    LE,
    GE,
    // Punctuation
    LPAREN,
    RPAREN,
    COMMA,
    STAR,
}

impl Token {
    pub const fn as_str(self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::INSERT => "INSERT",
            Token::UPDATE => "UPDATE",
            Token::DELETE => "DELETE",
            Token::DISTINCT => "DISTINCT",
            Token::FROM => "FROM",
            Token::INTO => "INTO",
            Token::VALUES => "VALUES",
            Token::SET => "SET",
            Token::WHERE => "WHERE",
            Token::INNER => "INNER",
            Token::LEFT => "LEFT",
            Token::JOIN => "JOIN",
            Token::ON => "ON",
            Token::GROUP => "GROUP",
            Token::ORDER => "ORDER",
            Token::BY => "BY",
            Token::ASC => "ASC",
            Token::DESC => "DESC",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::NOT => "NOT",
            Token::IS => "IS",
            Token::NULL => "NULL",
            Token::LIKE => "LIKE",
            Token::EQ => "=",
            Token::LT => "<",
            Token::GT => ">",
            Token::LE => "<=",
            Token::GE => ">=",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::STAR => "*",
        }
    }

    /// Comparison operators are always surrounded by spaces.
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Token::EQ | Token::LT | Token::GT | Token::LE | Token::GE
        )
    }

    pub const fn is_punctuation(self) -> bool {
        matches!(self, Token::LPAREN | Token::RPAREN | Token::COMMA)
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
