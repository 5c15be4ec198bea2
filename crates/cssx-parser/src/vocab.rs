//! HTML vocabulary tables used by the content classifier.
//!
//! Tag names, per-element attribute names, event handler attributes and
//! ARIA attributes, kept as static lookup sets.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Known HTML tag names, including legacy and obsolete ones.
pub const TAG_NAMES: &[&str] = &[
    "a", "abbr", "acronym", "address", "applet", "area", "article", "aside", "audio", "b",
    "base", "basefont", "bdi", "bdo", "bgsound", "big", "blink", "blockquote", "body", "br",
    "button", "canvas", "caption", "center", "cite", "code", "col", "colgroup", "command",
    "content", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "dir", "div", "dl",
    "dt", "element", "em", "embed", "fieldset", "figcaption", "figure", "font", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header",
    "hgroup", "hr", "html", "i", "iframe", "image", "img", "input", "ins", "isindex", "kbd",
    "keygen", "label", "legend", "li", "link", "listing", "main", "map", "mark", "marquee",
    "math", "menu", "menuitem", "meta", "meter", "multicol", "nav", "nextid", "nobr",
    "noembed", "noframes", "noscript", "object", "ol", "optgroup", "option", "output", "p",
    "param", "picture", "plaintext", "pre", "progress", "q", "rb", "rbc", "rp", "rt", "rtc",
    "ruby", "s", "samp", "script", "search", "section", "select", "shadow", "slot", "small",
    "source", "spacer", "span", "strike", "strong", "style", "sub", "summary", "sup", "svg",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title",
    "tr", "track", "tt", "u", "ul", "var", "video", "wbr", "xmp",
];

/// Attributes valid on every element.
pub const GLOBAL_ATTRIBUTES: &[&str] = &[
    "accesskey", "autocapitalize", "autofocus", "class", "contenteditable", "dir",
    "draggable", "enterkeyhint", "hidden", "id", "inert", "inputmode", "is", "itemid",
    "itemprop", "itemref", "itemscope", "itemtype", "lang", "nonce", "popover", "slot",
    "spellcheck", "style", "tabindex", "title", "translate", "writingsuggestions",
];

/// Event handler attributes. Repeated declarations of these concatenate.
pub const EVENT_ATTRIBUTES: &[&str] = &[
    "onabort", "onafterprint", "onauxclick", "onbeforematch", "onbeforeprint",
    "onbeforetoggle", "onbeforeunload", "onblur", "oncancel", "oncanplay",
    "oncanplaythrough", "onchange", "onclick", "onclose", "oncontextlost", "oncontextmenu",
    "oncontextrestored", "oncopy", "oncuechange", "oncut", "ondblclick", "ondrag",
    "ondragend", "ondragenter", "ondragexit", "ondragleave", "ondragover", "ondragstart",
    "ondrop", "ondurationchange", "onemptied", "onended", "onerror", "onfocus", "onformdata",
    "onhashchange", "oninput", "oninvalid", "onkeydown", "onkeypress", "onkeyup",
    "onlanguagechange", "onload", "onloadeddata", "onloadedmetadata", "onloadend",
    "onloadstart", "onmessage", "onmessageerror", "onmousedown", "onmouseenter",
    "onmouseleave", "onmousemove", "onmouseout", "onmouseover", "onmouseup", "onoffline",
    "ononline", "onpagehide", "onpagereveal", "onpageshow", "onpageswap", "onpaste",
    "onpause", "onplay", "onplaying", "onpopstate", "onprogress", "onratechange",
    "onrejectionhandled", "onreset", "onresize", "onscroll", "onscrollend",
    "onsecuritypolicyviolation", "onseeked", "onseeking", "onselect", "onslotchange",
    "onstalled", "onstorage", "onsubmit", "onsuspend", "ontimeupdate", "ontoggle",
    "onunhandledrejection", "onunload", "onvolumechange", "onwaiting", "onwheel",
];

/// WAI-ARIA state and property attributes.
pub const ARIA_ATTRIBUTES: &[&str] = &[
    "aria-activedescendant", "aria-atomic", "aria-autocomplete", "aria-braillelabel",
    "aria-brailleroledescription", "aria-busy", "aria-checked", "aria-colcount",
    "aria-colindex", "aria-colindextext", "aria-colspan", "aria-controls", "aria-current",
    "aria-describedby", "aria-description", "aria-details", "aria-disabled",
    "aria-dropeffect", "aria-errormessage", "aria-expanded", "aria-flowto", "aria-grabbed",
    "aria-haspopup", "aria-hidden", "aria-invalid", "aria-keyshortcuts", "aria-label",
    "aria-labelledby", "aria-level", "aria-live", "aria-modal", "aria-multiline",
    "aria-multiselectable", "aria-orientation", "aria-owns", "aria-placeholder",
    "aria-posinset", "aria-pressed", "aria-readonly", "aria-relevant", "aria-required",
    "aria-roledescription", "aria-rowcount", "aria-rowindex", "aria-rowindextext",
    "aria-rowspan", "aria-selected", "aria-setsize", "aria-sort", "aria-valuemax",
    "aria-valuemin", "aria-valuenow", "aria-valuetext",
];

/// HTML5 void elements (no closing tag).
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const CELL_ALIGN: &[&str] = &["align", "char", "charoff", "valign"];
const TABLE_CELL: &[&str] = &[
    "abbr", "align", "axis", "bgcolor", "char", "charoff", "colspan", "headers", "height",
    "nowrap", "rowspan", "scope", "valign", "width",
];
const COLUMN: &[&str] = &["align", "char", "charoff", "span", "valign", "width"];

/// Attributes specific to one element, on top of [`GLOBAL_ATTRIBUTES`].
pub fn element_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &[
            "charset", "coords", "download", "href", "hreflang", "name", "ping",
            "referrerpolicy", "rel", "rev", "shape", "target", "type",
        ],
        "applet" => &[
            "align", "alt", "archive", "code", "codebase", "height", "hspace", "name", "object",
            "vspace", "width",
        ],
        "area" => &[
            "alt", "coords", "download", "href", "hreflang", "nohref", "ping", "referrerpolicy",
            "rel", "shape", "target", "type",
        ],
        "audio" => &["autoplay", "controls", "crossorigin", "loop", "muted", "preload", "src"],
        "base" => &["href", "target"],
        "basefont" | "font" => &["color", "face", "size"],
        "blockquote" | "q" => &["cite"],
        "body" => &["alink", "background", "bgcolor", "link", "text", "vlink"],
        "br" => &["clear"],
        "button" => &[
            "disabled", "form", "formaction", "formenctype", "formmethod", "formnovalidate",
            "formtarget", "name", "popovertarget", "popovertargetaction", "type", "value",
        ],
        "canvas" => &["height", "width"],
        "caption" | "div" | "legend" | "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => &["align"],
        "col" | "colgroup" => COLUMN,
        "data" => &["value"],
        "del" | "ins" => &["cite", "datetime"],
        "details" => &["name", "open"],
        "dialog" => &["open"],
        "dir" | "dl" | "menu" => &["compact"],
        "embed" => &["height", "src", "type", "width"],
        "fieldset" => &["disabled", "form", "name"],
        "form" => &[
            "accept", "accept-charset", "action", "autocomplete", "enctype", "method", "name",
            "novalidate", "target",
        ],
        "frame" => &[
            "frameborder", "longdesc", "marginheight", "marginwidth", "name", "noresize",
            "scrolling", "src",
        ],
        "frameset" => &["cols", "rows"],
        "head" => &["profile"],
        "hr" => &["align", "noshade", "size", "width"],
        "html" => &["manifest", "version"],
        "iframe" => &[
            "align", "allow", "allowfullscreen", "allowpaymentrequest", "allowusermedia",
            "frameborder", "height", "loading", "longdesc", "marginheight", "marginwidth",
            "name", "referrerpolicy", "sandbox", "scrolling", "src", "srcdoc", "width",
        ],
        "img" => &[
            "align", "alt", "border", "crossorigin", "decoding", "fetchpriority", "height",
            "hspace", "ismap", "loading", "longdesc", "name", "referrerpolicy", "sizes", "src",
            "srcset", "usemap", "vspace", "width",
        ],
        "input" => &[
            "accept", "align", "alt", "autocomplete", "checked", "dirname", "disabled", "form",
            "formaction", "formenctype", "formmethod", "formnovalidate", "formtarget", "height",
            "ismap", "list", "max", "maxlength", "min", "minlength", "multiple", "name",
            "pattern", "placeholder", "popovertarget", "popovertargetaction", "readonly",
            "required", "size", "src", "step", "type", "usemap", "value", "width",
        ],
        "isindex" => &["prompt"],
        "label" => &["for", "form"],
        "li" => &["type", "value"],
        "link" => &[
            "as", "blocking", "charset", "color", "crossorigin", "disabled", "fetchpriority",
            "href", "hreflang", "imagesizes", "imagesrcset", "integrity", "media",
            "referrerpolicy", "rel", "rev", "sizes", "target", "type",
        ],
        "map" | "slot" => &["name"],
        "meta" => &["charset", "content", "http-equiv", "media", "name", "scheme"],
        "meter" => &["high", "low", "max", "min", "optimum", "value"],
        "object" => &[
            "align", "archive", "border", "classid", "codebase", "codetype", "data", "declare",
            "form", "height", "hspace", "name", "standby", "type", "typemustmatch", "usemap",
            "vspace", "width",
        ],
        "ol" => &["compact", "reversed", "start", "type"],
        "optgroup" => &["disabled", "label"],
        "option" => &["disabled", "label", "selected", "value"],
        "output" => &["for", "form", "name"],
        "param" => &["name", "type", "value", "valuetype"],
        "pre" => &["width"],
        "progress" => &["max", "value"],
        "script" => &[
            "async", "blocking", "charset", "crossorigin", "defer", "fetchpriority",
            "integrity", "language", "nomodule", "referrerpolicy", "src", "type",
        ],
        "select" => &["autocomplete", "disabled", "form", "multiple", "name", "required", "size"],
        "source" => &["height", "media", "sizes", "src", "srcset", "type", "width"],
        "style" => &["blocking", "media", "type"],
        "table" => &[
            "align", "bgcolor", "border", "cellpadding", "cellspacing", "frame", "rules",
            "summary", "width",
        ],
        "tbody" | "tfoot" | "thead" => CELL_ALIGN,
        "td" | "th" => TABLE_CELL,
        "template" => &[
            "shadowrootclonable", "shadowrootdelegatesfocus", "shadowrootmode",
        ],
        "textarea" => &[
            "autocomplete", "cols", "dirname", "disabled", "form", "maxlength", "minlength",
            "name", "placeholder", "readonly", "required", "rows", "wrap",
        ],
        "time" => &["datetime"],
        "tr" => &["align", "bgcolor", "char", "charoff", "valign"],
        "track" => &["default", "kind", "label", "src", "srclang"],
        "ul" => &["compact", "type"],
        "video" => &[
            "autoplay", "controls", "crossorigin", "height", "loop", "muted", "playsinline",
            "poster", "preload", "src", "width",
        ],
        _ => &[],
    }
}

static TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| TAG_NAMES.iter().copied().collect());

static GLOBAL_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    GLOBAL_ATTRIBUTES
        .iter()
        .chain(EVENT_ATTRIBUTES)
        .chain(ARIA_ATTRIBUTES)
        .copied()
        .collect()
});

static ANY_ELEMENT_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    TAG_NAMES
        .iter()
        .flat_map(|tag| element_attributes(tag).iter().copied())
        .collect()
});

static EVENT_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| EVENT_ATTRIBUTES.iter().copied().collect());

pub fn is_tag_name(name: &str) -> bool {
    TAG_SET.contains(name)
}

pub fn is_event_attribute(name: &str) -> bool {
    EVENT_SET.contains(name)
}

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Whether `name` is an attribute valid on every element (global, event or ARIA).
pub fn is_global_attribute(name: &str) -> bool {
    GLOBAL_SET.contains(name)
}

/// Whether `name` is element-specific for at least one tag.
pub fn is_any_element_attribute(name: &str) -> bool {
    ANY_ELEMENT_SET.contains(name)
}
