//! Reserved words per language
//!
//! The minifier never renames a reserved word. C# keywords are matched
//! exactly; VB.NET keywords case-insensitively.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::Language;

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "add", "alias", "and", "as", "ascending", "async", "await", "base",
    "bool", "break", "by", "byte", "case", "catch", "char", "checked", "class", "const",
    "continue", "decimal", "default", "delegate", "descending", "do", "double", "dynamic",
    "else", "enum", "equals", "event", "explicit", "extern", "false", "file", "finally",
    "fixed", "float", "for", "foreach", "from", "get", "global", "goto", "group", "if",
    "implicit", "in", "init", "int", "interface", "internal", "into", "is", "join", "let",
    "lock", "long", "managed", "nameof", "namespace", "new", "nint", "not", "notnull",
    "nuint", "null", "object", "on", "operator", "or", "orderby", "out", "override",
    "params", "partial", "private", "protected", "public", "readonly", "record", "ref",
    "remove", "required", "return", "sbyte", "scoped", "sealed", "select", "set", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw",
    "true", "try", "typeof", "uint", "ulong", "unchecked", "unmanaged", "unsafe",
    "ushort", "using", "value", "var", "virtual", "void", "volatile", "when", "where",
    "while", "with", "yield",
];

const VB_KEYWORDS: &[&str] = &[
    "addhandler", "addressof", "alias", "and", "andalso", "as", "async", "await",
    "boolean", "byref", "byte", "byval", "call", "case", "catch", "cbool", "cbyte",
    "cchar", "cdate", "cdbl", "cdec", "char", "cint", "class", "clng", "cobj", "const",
    "continue", "csbyte", "cshort", "csng", "cstr", "ctype", "cuint", "culng", "cushort",
    "custom", "date", "decimal", "declare", "default", "delegate", "dim", "directcast",
    "do", "double", "each", "else", "elseif", "end", "endif", "enum", "erase", "error",
    "event", "exit", "false", "finally", "for", "friend", "function", "get", "gettype",
    "getxmlnamespace", "global", "gosub", "goto", "handles", "if", "implements",
    "imports", "in", "inherits", "integer", "interface", "is", "isnot", "iterator",
    "key", "let", "lib", "like", "long", "loop", "me", "mod", "module", "mustinherit",
    "mustoverride", "mybase", "myclass", "namespace", "narrowing", "new", "next", "not",
    "nothing", "notinheritable", "notoverridable", "object", "of", "on", "operator",
    "option", "optional", "or", "orelse", "out", "overloads", "overridable", "overrides",
    "paramarray", "partial", "preserve", "private", "property", "protected", "public",
    "raiseevent", "readonly", "redim", "rem", "removehandler", "resume", "return",
    "sbyte", "select", "set", "shadows", "shared", "short", "single", "static", "step",
    "stop", "string", "structure", "sub", "synclock", "then", "throw", "to", "true",
    "try", "trycast", "typeof", "uinteger", "ulong", "ushort", "using", "value", "variant",
    "wend", "when", "while", "widening", "with", "withevents", "writeonly", "xor",
    "yield",
];

static CSHARP_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CSHARP_KEYWORDS.iter().copied().collect());

static VB_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| VB_KEYWORDS.iter().copied().collect());

/// True when `word` is reserved in `language`.
///
/// Unrecognized languages reserve nothing.
pub fn is_keyword(language: Language, word: &str) -> bool {
    match language {
        Language::CSharp => CSHARP_SET.contains(word),
        Language::VisualBasic => VB_SET.contains(word.to_ascii_lowercase().as_str()),
        Language::Unrecognized => false,
    }
}
