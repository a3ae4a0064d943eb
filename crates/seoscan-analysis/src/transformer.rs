//! Product data transformer
//!
//! Maps a raw store-platform product record into the four worker-specific
//! input shapes. Pure over its input; no network or storage side effects.
//! The Shopify Admin API surfaces connections either as GraphQL edge lists
//! (`{edges: [{node: {...}}]}`) or as flat arrays depending on the query
//! path, so both shapes are accepted and normalized.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::input::{
    ImageInput, MetafieldInput, ParallelAnalysisInput, ProductContentInput, SeoMetadataInput,
};

/// Placeholder used when a product carries no usable description text
pub const NO_DESCRIPTION: &str = "No description available";

/// Exact `namespace.key` pairs that always count as SEO-relevant
const SEO_METAFIELD_ALLOWLIST: &[&str] = &[
    "global.title_tag",
    "global.description_tag",
    "seo.title",
    "seo.description",
    "custom.seo_title",
    "custom.seo_description",
    "reviews.rating",
    "reviews.rating_count",
];

/// A connection that tolerates both GraphQL edge-list and flat-array shapes
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Connection<T> {
    Edges { edges: Vec<Edge<T>> },
    Flat(Vec<Option<T>>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: Option<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Connection::Flat(Vec::new())
    }
}

impl<T: Clone> Connection<T> {
    /// Normalize into a plain list, discarding entries without a node/object
    pub fn items(&self) -> Vec<T> {
        match self {
            Connection::Edges { edges } => {
                edges.iter().filter_map(|e| e.node.clone()).collect()
            }
            Connection::Flat(items) => items.iter().filter_map(|i| i.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default, alias = "src")]
    pub url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetafield {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Raw product record as supplied by the product source
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "bodyHtml")]
    pub description: Option<String>,
    #[serde(default)]
    pub seo: Option<RawSeo>,
    #[serde(default)]
    pub images: Connection<RawImage>,
    #[serde(default)]
    pub metafields: Connection<RawMetafield>,
}

/// Ids arrive as GraphQL gid strings or as plain REST integers
fn de_opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Outcome of soft input validation
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Transforms raw product records into per-aspect analysis inputs
pub struct ProductTransformer {
    tag_re: Regex,
    ws_re: Regex,
}

impl ProductTransformer {
    pub fn new() -> Self {
        Self {
            tag_re: Regex::new(r"<[^>]*>").unwrap(),
            ws_re: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Map one raw product into the four worker input shapes
    pub fn transform(&self, product: &RawProduct) -> ParallelAnalysisInput {
        let product_id = product.id.clone().unwrap_or_default();

        let mut description = self.strip_html(product.description.as_deref().unwrap_or(""));
        if description.is_empty() {
            description = NO_DESCRIPTION.to_string();
        }

        let product_content = ProductContentInput {
            product_id: product_id.clone(),
            title: product.title.trim().to_string(),
            description,
            suggestion_history: Vec::new(),
            prior_analysis: None,
        };

        let seo = product.seo.clone().unwrap_or_default();
        let seo_metadata = SeoMetadataInput {
            product_id: product_id.clone(),
            seo_title: seo.title.unwrap_or_default(),
            seo_description: seo.description.unwrap_or_default(),
        };

        let images = product
            .images
            .items()
            .into_iter()
            .map(|img| ImageInput {
                product_id: product_id.clone(),
                image_id: img.id.unwrap_or_default(),
                image_url: img.url,
                alt_text: img.alt_text.unwrap_or_default(),
            })
            .collect();

        let metafields = product
            .metafields
            .items()
            .into_iter()
            .filter(|mf| Self::is_seo_relevant(&mf.namespace, &mf.key))
            .map(|mf| MetafieldInput {
                product_id: product_id.clone(),
                metafield_id: mf.id.unwrap_or_default(),
                namespace: mf.namespace,
                key: mf.key,
                value: mf.value,
            })
            .collect();

        ParallelAnalysisInput {
            product_content,
            seo_metadata,
            images,
            metafields,
        }
    }

    /// Strip HTML tags, decode the common entities, and collapse whitespace
    pub fn strip_html(&self, html: &str) -> String {
        let text = self.tag_re.replace_all(html, "");
        let text = text
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");
        self.ws_re.replace_all(&text, " ").trim().to_string()
    }

    /// Whether a metafield belongs to the SEO-relevant subset
    pub fn is_seo_relevant(namespace: &str, key: &str) -> bool {
        let pair = format!("{}.{}", namespace, key);
        if SEO_METAFIELD_ALLOWLIST.contains(&pair.as_str()) {
            return true;
        }
        let namespace = namespace.to_lowercase();
        let key = key.to_lowercase();
        ["seo", "title", "description"]
            .iter()
            .any(|needle| namespace.contains(needle) || key.contains(needle))
    }

    /// Soft validation: problems are reported, never block analysis
    ///
    /// Cross-checks catch data corruption from upstream joins, where an
    /// image or metafield row ends up attached to the wrong product.
    pub fn validate(&self, input: &ParallelAnalysisInput) -> ValidationReport {
        let mut errors = Vec::new();
        let product_id = input.product_id();

        if product_id.is_empty() {
            errors.push("missing product id".to_string());
        }
        if input.product_content.title.is_empty() {
            errors.push("missing product title".to_string());
        }

        for (i, image) in input.images.iter().enumerate() {
            if image.product_id != product_id {
                errors.push(format!(
                    "image {} belongs to product {}, expected {}",
                    i, image.product_id, product_id
                ));
            }
            if image.image_id.is_empty() {
                errors.push(format!("image {} has no id", i));
            }
        }

        for (i, metafield) in input.metafields.iter().enumerate() {
            if metafield.product_id != product_id {
                errors.push(format!(
                    "metafield {} belongs to product {}, expected {}",
                    i, metafield.product_id, product_id
                ));
            }
            if metafield.metafield_id.is_empty() {
                errors.push(format!("metafield {} has no id", i));
            }
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

impl Default for ProductTransformer {
    fn default() -> Self {
        Self::new()
    }
}
