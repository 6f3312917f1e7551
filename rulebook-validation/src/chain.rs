//! Rule-chain tokenizer
//!
//! A rule string is a space separated list of tokens. A token is either a
//! bare word (`required`) or a call with a parenthesized argument list
//! (`between(3, 5)`). Inside an argument list `,` separates arguments at the
//! outermost depth, balanced inner parentheses are kept verbatim, and a
//! backslash before a character suppresses its special meaning. `\(`, `\)`
//! and `\,` are unescaped in argument text; arguments are trimmed of spaces.
//!
//! [`scan`] yields the calls lazily so the caller can stop pulling as soon as
//! a field fails.

/// One verb invocation produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<'a> {
    /// Verb name, borrowed from the rule string
    pub verb: &'a str,
    /// Unescaped, trimmed arguments
    pub args: Vec<String>,
    /// The token carried an argument list, even an empty one
    pub parenthesized: bool,
}

impl<'a> Call<'a> {
    fn bare(verb: &'a str) -> Self {
        Self {
            verb,
            args: Vec::new(),
            parenthesized: false,
        }
    }
}

/// Tokenize a rule string.
///
/// ```
/// use rulebook_validation::scan;
///
/// let calls: Vec<_> = scan("age number between(18, 30)").collect();
/// assert_eq!(calls[0].verb, "age");
/// assert_eq!(calls[1].verb, "number");
/// assert_eq!(calls[2].verb, "between");
/// assert_eq!(calls[2].args, vec!["18", "30"]);
/// ```
pub fn scan(rule: &str) -> RuleChain<'_> {
    RuleChain::new(rule)
}

/// Lazy iterator over the calls of a rule string.
#[derive(Debug, Clone)]
pub struct RuleChain<'a> {
    rule: &'a str,
    chars: std::str::CharIndices<'a>,
    prev: char,
    depth: usize,
    token_start: Option<usize>,
    has_args: bool,
    paren_start: usize,
    arg_start: usize,
    args: Vec<String>,
    finished: bool,
}

impl<'a> RuleChain<'a> {
    fn new(rule: &'a str) -> Self {
        Self {
            rule,
            chars: rule.char_indices(),
            prev: ' ',
            depth: 0,
            token_start: None,
            has_args: false,
            paren_start: 0,
            arg_start: 0,
            args: Vec::new(),
            finished: false,
        }
    }

    fn in_args(&self) -> bool {
        self.depth > 0
    }

    fn push_arg(&mut self, end: usize) {
        self.args.push(unescape(&self.rule[self.arg_start..end]));
    }

    /// Feed one character, returning a call when it completes one.
    fn step(&mut self, i: usize, c: char) -> Option<Call<'a>> {
        let escaped = self.prev == '\\';

        if self.in_args() {
            if escaped {
                return None;
            }
            match c {
                '(' => self.depth += 1,
                ')' => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        let text = &self.rule[self.arg_start..i];
                        if !self.args.is_empty() || !text.trim_matches(' ').is_empty() {
                            self.push_arg(i);
                        }
                        let start = self.token_start.unwrap_or(self.paren_start);
                        return Some(Call {
                            verb: &self.rule[start..self.paren_start],
                            args: std::mem::take(&mut self.args),
                            parenthesized: true,
                        });
                    }
                }
                ',' if self.depth == 1 => {
                    self.push_arg(i);
                    self.arg_start = i + 1;
                }
                _ => {}
            }
            return None;
        }

        match c {
            ' ' => {
                let start = self.token_start.take()?;
                let had_args = std::mem::replace(&mut self.has_args, false);
                (!had_args).then(|| Call::bare(&self.rule[start..i]))
            }
            '(' if !escaped => {
                self.token_start.get_or_insert(i);
                self.has_args = true;
                self.depth = 1;
                self.paren_start = i;
                self.arg_start = i + 1;
                None
            }
            _ => {
                self.token_start.get_or_insert(i);
                None
            }
        }
    }
}

impl<'a> Iterator for RuleChain<'a> {
    type Item = Call<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some((i, c)) = self.chars.next() {
            let call = self.step(i, c);
            self.prev = c;
            if call.is_some() {
                return call;
            }
        }

        // End of string closes a pending bare token; an unclosed argument
        // list is dropped.
        self.finished = true;
        let start = self.token_start.take()?;
        (!self.has_args && !self.in_args()).then(|| Call::bare(&self.rule[start..]))
    }
}

impl std::iter::FusedIterator for RuleChain<'_> {}

fn unescape(text: &str) -> String {
    text.replace("\\)", ")")
        .replace("\\(", "(")
        .replace("\\,", ",")
        .trim_matches(' ')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbs(rule: &str) -> Vec<(String, Vec<String>)> {
        scan(rule)
            .map(|call| (call.verb.to_string(), call.args))
            .collect()
    }

    fn call(verb: &str, args: &[&str]) -> (String, Vec<String>) {
        (verb.to_string(), args.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn test_bare_tokens() {
        assert_eq!(
            verbs("age number required"),
            vec![call("age", &[]), call("number", &[]), call("required", &[])]
        );
    }

    #[test]
    fn test_field_name_only() {
        assert_eq!(verbs("age"), vec![call("age", &[])]);
        assert_eq!(verbs("a"), vec![call("a", &[])]);
    }

    #[test]
    fn test_single_char_last_token() {
        assert_eq!(verbs("name x"), vec![call("name", &[]), call("x", &[])]);
    }

    #[test]
    fn test_calls_with_arguments() {
        assert_eq!(
            verbs("age number required greaterThan(18) lessThanOrEqual(65)"),
            vec![
                call("age", &[]),
                call("number", &[]),
                call("required", &[]),
                call("greaterThan", &["18"]),
                call("lessThanOrEqual", &["65"]),
            ]
        );
    }

    #[test]
    fn test_arguments_are_trimmed() {
        assert_eq!(verbs("f in( a , b ,c )"), vec![call("f", &[]), call("in", &["a", "b", "c"])]);
    }

    #[test]
    fn test_escaped_comma() {
        assert_eq!(verbs("f verb(a\\,b,c)"), vec![call("f", &[]), call("verb", &["a,b", "c"])]);
    }

    #[test]
    fn test_escaped_parentheses() {
        assert_eq!(
            verbs("f regex(^\\(\\d+\\)$)"),
            vec![call("f", &[]), call("regex", &["^(\\d+)$"])]
        );
    }

    #[test]
    fn test_nested_parentheses_keep_inner_commas() {
        assert_eq!(
            verbs("code string regex(^(a|b,c)+$) required"),
            vec![
                call("code", &[]),
                call("string", &[]),
                call("regex", &["^(a|b,c)+$"]),
                call("required", &[]),
            ]
        );
    }

    #[test]
    fn test_spaces_inside_arguments() {
        assert_eq!(verbs("f in(a b, c d)"), vec![call("f", &[]), call("in", &["a b", "c d"])]);
    }

    #[test]
    fn test_consecutive_spaces() {
        assert_eq!(
            verbs("  name   string  required "),
            vec![call("name", &[]), call("string", &[]), call("required", &[])]
        );
    }

    #[test]
    fn test_parenthesized_type_form() {
        let calls: Vec<_> = scan("age(number) between(1,2)").collect();
        assert_eq!(calls[0].verb, "age");
        assert_eq!(calls[0].args, vec!["number"]);
        assert!(calls[0].parenthesized);
        assert_eq!(calls[1].args, vec!["1", "2"]);
    }

    #[test]
    fn test_empty_argument_list() {
        let calls: Vec<_> = scan("f confirmed()").collect();
        assert_eq!(calls[1].verb, "confirmed");
        assert!(calls[1].args.is_empty());
        assert!(calls[1].parenthesized);
    }

    #[test]
    fn test_empty_trailing_argument_is_kept() {
        assert_eq!(verbs("f in(a,)"), vec![call("f", &[]), call("in", &["a", ""])]);
    }

    #[test]
    fn test_unclosed_argument_list_is_dropped() {
        assert_eq!(verbs("f required in(a,b"), vec![call("f", &[]), call("required", &[])]);
    }

    #[test]
    fn test_stray_close_paren_is_literal() {
        assert_eq!(verbs("f a) b"), vec![call("f", &[]), call("a)", &[]), call("b", &[])]);
    }

    #[test]
    fn test_empty_rule() {
        assert!(verbs("").is_empty());
        assert!(verbs("   ").is_empty());
    }

    #[test]
    fn test_stops_when_caller_stops() {
        let mut chain = scan("f required min(3) max(5)");
        assert_eq!(chain.next().unwrap().verb, "f");
        assert_eq!(chain.next().unwrap().verb, "required");
        drop(chain);

        let taken: Vec<_> = scan("f a b c").take_while(|c| c.verb != "b").collect();
        assert_eq!(taken.len(), 2);
    }

    #[test]
    fn test_multibyte_arguments() {
        assert_eq!(
            verbs("name string in(علی,رضا)"),
            vec![call("name", &[]), call("string", &[]), call("in", &["علی", "رضا"])]
        );
    }
}
