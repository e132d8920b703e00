//! Wire-format vocabulary of the MDM system.
//!
//! Entity-type names, attribute codes and relationship-type names are fixed
//! by the master-data schema and appear verbatim in request payloads and
//! entity records.

/// Article entity type. The only type whose clone receives an externally
/// issued SAP article number instead of a generated UUID.
pub const TYPE_ARTICLE: &str = "exartikel";

/// Trade item entity type.
pub const TYPE_TRADE_ITEM: &str = "extradeitem";

/// Supplier-article entity type (an article's supplier-specific branch).
pub const TYPE_SUPPLIER_ARTICLE: &str = "exlieferantenartikel";

/// Supplier entity type.
pub const TYPE_SUPPLIER: &str = "exlieferant";

/// Reference-data type mapping article classifications to numbering ranges.
pub const TYPE_ARTICLE_KIND_REF: &str = "refxartikelartsap";

/// SAP article number.
pub const ATTR_SAP_ARTICLE_NR: &str = "axartikelnrsap";

/// Stable business identifier.
pub const ATTR_IDENTIFIER: &str = "axidentifier";

/// Derived display name.
pub const ATTR_MDM_NAME: &str = "axmdmname";

/// Supplier number.
pub const ATTR_SUPPLIER_NR: &str = "axlieferantennr";

/// Supplier name (first name line).
pub const ATTR_NAME_ONE: &str = "axnameeins";

/// SAP article classification code on the article.
pub const ATTR_ARTICLE_KIND: &str = "axartikelartsap";

/// Numbering-sequence key on the classification reference record.
pub const ATTR_NUMBER_RANGE: &str = "arefxnummernkreis";

/// Relationship attribute flagging the default/primary supplier relation.
pub const ATTR_DEFAULT_SUPPLIER: &str = "arelxregellieferant";

/// Article -> supplier relationship.
pub const REL_SUPPLIER_TO_ARTICLE: &str = "relxliefzuart";

/// Supplier-article -> supplier relationship.
pub const REL_SUPPLIER_TO_SUPPLIER_ARTICLE: &str = "relxliefzuliefart";

/// Supplier-article -> trade item relationship.
pub const REL_TRADE_ITEM_TO_SUPPLIER_ARTICLE: &str = "relxtradeitemzuliefartikel";

/// Trade item -> article relationship.
pub const REL_TRADE_ITEM_TO_ARTICLE: &str = "relxtradeitemzuart";

/// Article -> supplier-article relationship.
pub const REL_ARTICLE_TO_SUPPLIER_ARTICLE: &str = "relxartikelzulieferantenartikel";

/// Locale tag stamped on written attribute values.
pub const LOCALE_DEFAULT: &str = "de-DE";

/// Provenance tag stamped on written attribute values.
pub const SOURCE_INTERNAL: &str = "internal";

/// Slot id of the first value/relationship entry.
pub const SLOT_FIRST: &str = "1_0_0";
