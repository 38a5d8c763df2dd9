/// Exasol reserved keywords, lower-case and sorted for binary search.
pub const RESERVED_WORDS: &[&str] = &[
    "absolute",
    "action",
    "add",
    "after",
    "all",
    "allocate",
    "alter",
    "and",
    "any",
    "append",
    "are",
    "array",
    "as",
    "asc",
    "asensitive",
    "assertion",
    "at",
    "attribute",
    "authid",
    "authorization",
    "before",
    "begin",
    "between",
    "bigint",
    "binary",
    "bit",
    "blob",
    "blocked",
    "bool",
    "boolean",
    "both",
    "by",
    "byte",
    "call",
    "called",
    "cardinality",
    "cascade",
    "cascaded",
    "case",
    "casespecific",
    "cast",
    "catalog",
    "chain",
    "char",
    "character",
    "character_set_catalog",
    "character_set_name",
    "character_set_schema",
    "characteristics",
    "check",
    "checked",
    "clob",
    "close",
    "coalesce",
    "collate",
    "collation",
    "collation_catalog",
    "collation_name",
    "collation_schema",
    "column",
    "commit",
    "condition",
    "connect_by_iscycle",
    "connect_by_isleaf",
    "connect_by_root",
    "connection",
    "constant",
    "constraint",
    "constraint_state_default",
    "constraints",
    "constructor",
    "contains",
    "continue",
    "control",
    "convert",
    "corresponding",
    "create",
    "cs",
    "csv",
    "cube",
    "current",
    "current_date",
    "current_path",
    "current_role",
    "current_schema",
    "current_session",
    "current_statement",
    "current_time",
    "current_timestamp",
    "current_user",
    "cursor",
    "cycle",
    "data",
    "datalink",
    "date",
    "datetime_interval_code",
    "datetime_interval_precision",
    "day",
    "dbtimezone",
    "deallocate",
    "dec",
    "decimal",
    "declare",
    "default",
    "default_like_escape_character",
    "deferrable",
    "deferred",
    "defined",
    "definer",
    "delete",
    "deref",
    "derived",
    "desc",
    "describe",
    "descriptor",
    "deterministic",
    "disable",
    "disabled",
    "disconnect",
    "dispatch",
    "distinct",
    "dlurlcomplete",
    "dlurlpath",
    "dlurlpathonly",
    "dlurlscheme",
    "dlurlserver",
    "dlvalue",
    "do",
    "domain",
    "double",
    "drop",
    "dynamic",
    "dynamic_function",
    "dynamic_function_code",
    "each",
    "else",
    "elseif",
    "elsif",
    "emits",
    "enable",
    "enabled",
    "end",
    "end-exec",
    "endif",
    "enforce",
    "equals",
    "errors",
    "escape",
    "except",
    "exception",
    "exec",
    "execute",
    "exists",
    "exit",
    "export",
    "external",
    "extract",
    "false",
    "fbv",
    "fetch",
    "file",
    "final",
    "first",
    "float",
    "following",
    "for",
    "forall",
    "force",
    "format",
    "found",
    "from",
    "fs",
    "full",
    "function",
    "general",
    "generated",
    "geometry",
    "get",
    "global",
    "go",
    "goto",
    "grant",
    "granted",
    "group",
    "group_concat",
    "grouping",
    "groups",
    "hashtype",
    "hashtype_format",
    "having",
    "high",
    "hold",
    "hour",
    "identity",
    "if",
    "ifnull",
    "immediate",
    "impersonate",
    "implementation",
    "import",
    "in",
    "index",
    "indicator",
    "inner",
    "inout",
    "input",
    "insensitive",
    "insert",
    "instance",
    "instantiable",
    "int",
    "integer",
    "integrity",
    "intersect",
    "interval",
    "into",
    "inverse",
    "invoker",
    "is",
    "iterate",
    "join",
    "key_member",
    "key_type",
    "large",
    "last",
    "lateral",
    "ldap",
    "leading",
    "leave",
    "left",
    "level",
    "like",
    "limit",
    "listagg",
    "localtime",
    "localtimestamp",
    "locator",
    "log",
    "longvarchar",
    "loop",
    "low",
    "map",
    "match",
    "matched",
    "merge",
    "method",
    "minus",
    "minute",
    "mod",
    "modifies",
    "modify",
    "module",
    "month",
    "names",
    "national",
    "natural",
    "nchar",
    "nclob",
    "new",
    "next",
    "nls_date_format",
    "nls_date_language",
    "nls_first_day_of_week",
    "nls_numeric_characters",
    "nls_timestamp_format",
    "no",
    "nocycle",
    "nologging",
    "none",
    "not",
    "null",
    "nullif",
    "number",
    "numeric",
    "nvarchar",
    "nvarchar2",
    "object",
    "of",
    "off",
    "old",
    "on",
    "only",
    "open",
    "option",
    "options",
    "or",
    "order",
    "ordering",
    "ordinality",
    "others",
    "out",
    "outer",
    "output",
    "over",
    "overlaps",
    "overlay",
    "overriding",
    "pad",
    "parallel_enable",
    "parameter",
    "parameter_specific_catalog",
    "parameter_specific_name",
    "parameter_specific_schema",
    "parquet",
    "partial",
    "path",
    "permission",
    "placing",
    "plus",
    "preceding",
    "preferring",
    "prepare",
    "preserve",
    "prior",
    "privileges",
    "procedure",
    "profile",
    "qualify",
    "random",
    "range",
    "read",
    "reads",
    "real",
    "recovery",
    "recursive",
    "ref",
    "references",
    "referencing",
    "refresh",
    "regexp_like",
    "relative",
    "release",
    "rename",
    "repeat",
    "replace",
    "restore",
    "restrict",
    "result",
    "return",
    "returned_length",
    "returned_octet_length",
    "returns",
    "revoke",
    "right",
    "rollback",
    "rollup",
    "routine",
    "row",
    "rows",
    "rowtype",
    "savepoint",
    "schema",
    "scope",
    "scope_user",
    "script",
    "scroll",
    "search",
    "second",
    "section",
    "security",
    "select",
    "selective",
    "self",
    "sensitive",
    "separator",
    "sequence",
    "session",
    "session_user",
    "sessiontimezone",
    "set",
    "sets",
    "shortint",
    "similar",
    "smallint",
    "some",
    "source",
    "space",
    "specific",
    "specifictype",
    "sql",
    "sql_bigint",
    "sql_bit",
    "sql_char",
    "sql_date",
    "sql_decimal",
    "sql_double",
    "sql_float",
    "sql_integer",
    "sql_longvarchar",
    "sql_numeric",
    "sql_preprocessor_script",
    "sql_real",
    "sql_smallint",
    "sql_timestamp",
    "sql_tinyint",
    "sql_type_date",
    "sql_type_timestamp",
    "sql_varchar",
    "sqlexception",
    "sqlstate",
    "sqlwarning",
    "start",
    "state",
    "statement",
    "static",
    "structure",
    "style",
    "substring",
    "subtype",
    "sysdate",
    "system",
    "system_user",
    "systimestamp",
    "table",
    "temporary",
    "text",
    "then",
    "time",
    "timestamp",
    "timezone_hour",
    "timezone_minute",
    "tinyint",
    "to",
    "trailing",
    "transaction",
    "transform",
    "transforms",
    "translation",
    "treat",
    "trigger",
    "trim",
    "true",
    "truncate",
    "under",
    "union",
    "unique",
    "unknown",
    "unlink",
    "unnest",
    "until",
    "update",
    "usage",
    "user",
    "using",
    "value",
    "values",
    "varchar",
    "varchar2",
    "varray",
    "verify",
    "view",
    "when",
    "whenever",
    "where",
    "while",
    "window",
    "with",
    "within",
    "without",
    "work",
    "year",
    "yes",
    "zone",
];
