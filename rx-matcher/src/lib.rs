/*!
A small regular-expression engine built on an explicit NFA graph with
array-based backtracking.

A pattern compiles into a pool of typed nodes: literal bytes, byte sets,
UTF-8 aware character classes, zero-width assertions, branches, capture
boundaries and quantifiers. Matching runs a stackless interpreter that
records every choice point in a flat trail and unwinds the trail on dead
ends, so recursion depth never depends on the input. Character classes
decode whole UTF-8 characters; everything else works on raw bytes, which
keeps the engine usable on arbitrary byte streams.

## Usage
```
use rx_matcher::{Matcher, Regex};

let re = Regex::new(r"\d+\.\d+\.\d+\.\d+")?;
let mut m = Matcher::new();
let hay = b"There's no place like 127.0.0.1.";
let found = re.find(&mut m, hay).unwrap();
assert_eq!(&hay[found.range()], b"127.0.0.1");
# Ok::<(), rx_matcher::BuildError>(())
```

Captures are read back from the [`Matcher`] after a successful search:
```
use rx_matcher::{Matcher, Regex};

let re = Regex::new(r"(\w+)=(\w+)")?;
let mut m = Matcher::new();
let hay = b"timeout=250";
assert!(re.match_at(&mut m, hay, 0));
assert_eq!(m.capture_bytes(hay, 1), Some(&b"timeout"[..]));
assert_eq!(m.capture_bytes(hay, 2), Some(&b"250"[..]));
# Ok::<(), rx_matcher::BuildError>(())
```

## Syntax

- Literal bytes; any escaped byte with no other meaning matches itself.
- `.` — any single byte. `\N` — any byte but `\n`.
- `\d \D \w \W \s \S` — digit, word and whitespace byte sets and their
  complements (`\s` is space, tab, `\n`, `\r`).
- `[...]`, `[^...]` — character classes over decoded UTF-8 characters,
  with values, ranges (`[α-ω]`) and the named sets above. A lone or
  trailing `-` is a literal.
- `(...)` capturing group, `(?:...)` non-capturing group, `|` alternation.
- `* + ?` and `{m}`, `{m,}`, `{m,n}` quantifiers, each with a lazy `?`
  variant.
- Assertions: `^` start of text, `^^` start of line, `$` end of text,
  `$$` end of line (a lone `\r` counts), `\G` start of the search
  attempt, `\<` and `\>` word boundaries.
- Escapes: `\n \r \t \e`, `\xHH`, `\uHHHH`, `\UHHHHHHHH`.
- `\c` anywhere in the pattern makes matching ASCII-case-insensitive.

## Reuse and sharing

A compiled [`Regex`] is immutable and can be shared freely. All search
state lives in the caller-provided [`Matcher`], whose buffers are reused
across calls; keep one matcher per thread and matching allocates nothing
in the steady state.
*/
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(feature = "doc", doc = document_features::document_features!())]

pub mod matcher;
pub mod nfa;
pub mod syntax;
pub mod unicode;

pub use crate::{
    matcher::{FindMatches, Match, Matcher},
    nfa::Regex,
    syntax::{BuildError, ErrorKind},
};
