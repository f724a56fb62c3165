use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Deref, Display, Error, From};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::domain::{DataAccessError, Entity, Id};

/// 顧客リポジトリ
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 顧客をIDで検索する
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError>;
    /// 全ての顧客をストアの順序で取得する
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError>;
    /// 新しいIDを採番して顧客を登録する
    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, DataAccessError>;
    /// 既存の顧客を置き換える。該当する顧客がいなければ何もせず`None`を返す
    async fn replace(&self, customer: Customer) -> Result<Option<Customer>, DataAccessError>;
    /// 顧客を削除して削除前の内容を返す
    async fn delete_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError>;
}

/// 顧客ID
#[serde_as]
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
    Deref,
    Default,
)]
pub struct CustomerId(#[serde_as(as = "PickFirst<(DisplayFromStr, _)>")] u64);

impl Id for CustomerId {
    type Inner = u64;
}

impl FromStr for CustomerId {
    type Err = CustomerIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(CustomerId)
            .map_err(|_| CustomerIdParseError)
    }
}

/// 顧客IDの解析エラー
#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display(fmt = "Invalid customer id")]
pub struct CustomerIdParseError;

/// IDを持たない顧客の内容
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_date_of_birth",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_member_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub member_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

/// 顧客エンティティ
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_date_of_birth",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_member_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub member_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

impl Customer {
    pub fn new(id: CustomerId, draft: CustomerDraft) -> Self {
        Self {
            id,
            name: draft.name,
            date_of_birth: draft.date_of_birth,
            member_number: draft.member_number,
            interests: draft.interests,
        }
    }

    pub fn into_draft(self) -> CustomerDraft {
        CustomerDraft {
            name: self.name,
            date_of_birth: self.date_of_birth,
            member_number: self.member_number,
            interests: self.interests,
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    const ENTITY_NAME: &'static str = "customer";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// `YYYY-MM-DD`もしくはRFC 3339形式の日時から日付を取り出す
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn deserialize_date_of_birth<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => parse_date(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {}", value))),
        _ => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn deserialize_member_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) if !text.trim().is_empty() => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid member number: {}", text))),
        _ => Ok(None),
    }
}
