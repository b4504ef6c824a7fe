//! Structs and logic to parse Newick strings into a [Tree].

use crate::model::{BranchLength, Tree, VertexIndex};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};

/// Newick label delimiters: parentheses, comma, colon, semicolon, brackets, whitespace
const NEWICK_LABEL_DELIMITERS: &[u8] = b"([,:; \n\t\r)]";

/// Default guess for number of leaves, when unknown
const DEFAULT_NUM_LEAVES_GUESS: usize = 10;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for Newick format phylogenetic trees.
///
/// # Format
/// * `tree ::= internal_vertex ';'`
/// * `vertex ::= leaf | internal_vertex`
/// * `internal_vertex ::= '(' vertex (',' vertex)* ')' [name] [branch_length]`
/// * `leaf ::= label [branch_length]`
/// * `branch_length ::= ':' number`
///
/// Whitespace and `[...]` comments can occur between elements. The optional
/// name after a closing parenthesis is where PhyML writes support values.
///
/// # Example
/// ```
/// use evodist::newick::NewickParser;
/// use evodist::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("(A:0.1,B:0.2,(C:0.3,D:0.4)0.87:0.05);");
/// let tree = NewickParser::new().parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 4);
/// ```
pub struct NewickParser {
    num_leaves: usize,
}

impl NewickParser {
    /// Creates a new [NewickParser] with default settings.
    pub fn new() -> Self {
        Self {
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
        }
    }

    /// Sets the expected number of leaves, used to pre-allocate the arena.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self
    }

    /// Parses all Newick trees from the byte source until EOF.
    ///
    /// # Errors
    /// Returns a [ParsingError] if any tree fails to parse.
    pub fn parse_all<S: ByteSource>(
        &mut self,
        mut parser: ByteParser<S>,
    ) -> Result<Vec<Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            parser.skip_comment_and_whitespace()?;
            if parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Errors
    /// Returns a [ParsingError] if the input holds no tree
    /// or the Newick string is malformed.
    pub fn parse_str<S: ByteSource>(
        &mut self,
        parser: &mut ByteParser<S>,
    ) -> Result<Tree, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::from_parser(ParsingErrorType::EmptyTree, parser));
        }

        let mut tree = Tree::new(self.num_leaves);
        self.parse_root(parser, &mut tree)?;

        // Remember the size for pre-allocating the next tree
        self.num_leaves = tree.num_leaves();

        Ok(tree)
    }
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses root of tree and adds it to tree:
    /// - `(children)[name][:branch_length];`
    fn parse_root<S: ByteSource>(
        &mut self,
        parser: &mut ByteParser<S>,
        tree: &mut Tree,
    ) -> Result<(), ParsingError> {
        let children = self.parse_children(parser, tree)?;
        let name = self.parse_name(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {next_char:?}"),
            ));
        }

        tree.add_root(children, name, branch_length);

        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index.
    fn parse_vertex<S: ByteSource>(
        &mut self,
        parser: &mut ByteParser<S>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            let children = self.parse_children(parser, tree)?;
            let name = self.parse_name(parser)?;
            let branch_length = self.parse_branch_length(parser)?;
            Ok(tree.add_internal_vertex(children, name, branch_length))
        } else {
            self.parse_leaf(parser, tree)
        }
    }

    /// Parses the parenthesised, comma separated children and returns their indices.
    fn parse_children<S: ByteSource>(
        &mut self,
        parser: &mut ByteParser<S>,
        tree: &mut Tree,
    ) -> Result<Vec<VertexIndex>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {next_char:?}"),
            ));
        }

        let mut children = vec![self.parse_vertex(parser, tree)?];
        loop {
            parser.skip_comment_and_whitespace()?;
            match parser.next_byte() {
                Some(b',') => children.push(self.parse_vertex(parser, tree)?),
                Some(b')') => return Ok(children),
                Some(other) => {
                    return Err(ParsingError::invalid_newick_string(
                        parser,
                        format!("Expected ',' or ')' after child but found {:?}", other as char),
                    ));
                }
                None => return Err(ParsingError::unexpected_eof(parser)),
            }
        }
    }

    /// Parses leaf vertex `label[:branch_length]` and adds it to tree.
    fn parse_leaf<S: ByteSource>(
        &mut self,
        parser: &mut ByteParser<S>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if label.is_empty() {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected leaf label but found {next_char:?}"),
            ));
        }
        let branch_length = self.parse_branch_length(parser)?;

        Ok(tree.add_leaf(branch_length, label))
    }

    /// Parses the optional name (or support value) of an internal vertex.
    fn parse_name<S: ByteSource>(
        &mut self,
        parser: &mut ByteParser<S>,
    ) -> Result<Option<String>, ParsingError> {
        let name = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        Ok((!name.is_empty()).then_some(name))
    }

    /// Parses optional branch length `[:number]`, supporting scientific notation.
    fn parse_branch_length<S: ByteSource>(
        &mut self,
        parser: &mut ByteParser<S>,
    ) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                branch_length_str.push(b as char);
                parser.next_byte();
            } else {
                break;
            }
        }

        branch_length_str
            .parse::<f64>()
            .ok()
            .and_then(BranchLength::new)
            .map(Some)
            .ok_or_else(|| {
                ParsingError::invalid_newick_string(
                    parser,
                    format!("Invalid branch length: {branch_length_str:?}"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_rooted_tree() {
        let mut parser = ByteParser::for_str("((A:1.0,B:2.0):3.0,C:4.0):0.5;");
        let tree = NewickParser::new().parse_str(&mut parser).unwrap();

        assert!(tree.is_valid());
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.num_internal(), 1);
        assert_eq!(tree.num_vertices(), 5);
        assert_eq!(tree.root().branch_length().map(|bl| *bl), Some(0.5));
    }

    #[test]
    fn test_support_values_become_names() {
        let mut parser = ByteParser::for_str("(A:0.1,B:0.2,(C:0.3,D:0.4)0.87:0.05);");
        let tree = NewickParser::new().parse_str(&mut parser).unwrap();
        let internal = tree
            .pre_order_iter()
            .find(|v| v.is_internal())
            .unwrap();
        assert_eq!(internal.name(), Some("0.87"));
        assert_eq!(internal.children().len(), 2);
        assert_eq!(tree.root().children().len(), 3);
    }

    #[test]
    fn test_missing_semicolon() {
        let mut parser = ByteParser::for_str("(A:0.1,B:0.2)");
        let err = NewickParser::new().parse_str(&mut parser).unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));
    }

    #[test]
    fn test_bad_branch_length() {
        let mut parser = ByteParser::for_str("(A:0.1,B:x);");
        assert!(NewickParser::new().parse_str(&mut parser).is_err());
    }

    #[test]
    fn test_truncated_tree() {
        let mut parser = ByteParser::for_str("(A:0.1,(B:0.2,C:0.3");
        let err = NewickParser::new().parse_str(&mut parser).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);
    }

    #[test]
    fn test_empty_input() {
        let mut parser = ByteParser::for_str("  [nothing here]\n");
        let err = NewickParser::new().parse_str(&mut parser).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::EmptyTree);
    }
}
