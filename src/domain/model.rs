use serde::{Deserialize, Deserializer, Serialize};

/// Punk API 的啤酒資料。API 回傳的 `id` 是數字，這裡統一存成字串當作列表 key。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_brewed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub code: Option<String>,
    pub name: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, rename = "emojiU", skip_serializing_if = "Option::is_none")]
    pub emoji_u: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<Language>,
}

/// `{ countries { name code } }` 的 data 欄位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub countries: Vec<Country>,
}

/// `country(code: $code)` 的 data 欄位；未知代碼時 `country` 為 null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryResponse {
    pub country: Option<Country>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeersPageProps {
    pub static_beers: Vec<Beer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountriesPageProps {
    pub static_countries: Vec<Country>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedBeerProps {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedCountryProps {
    pub code: String,
}

/// 可以被列表渲染的項目：穩定的 key 加上顯示文字
pub trait ListItem {
    fn key(&self) -> &str;
    fn label(&self) -> &str;
}

impl ListItem for Beer {
    fn key(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl ListItem for Country {
    fn key(&self) -> &str {
        &self.code
    }

    fn label(&self) -> &str {
        &self.name
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
