//! 一覧画面の登録・編集フォーム

use std::fmt;

use meibo::domain::customer::{parse_date, Customer, CustomerDraft, CustomerId};
use serde::{Deserialize, Serialize};

/// フォームに入力された値
///
/// 入力欄と同じく全て文字列で保持する。`_id`は編集中だけ送られる。
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub member_number: String,
    #[serde(default)]
    pub interests: String,
    /// 押されたボタン（`cancel`で編集の取り消し）
    #[serde(default, skip_serializing)]
    pub action: Option<String>,
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        Self {
            id: Some(customer.id.to_string()),
            name: customer.name.clone(),
            date_of_birth: date_input(customer),
            member_number: customer
                .member_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            interests: customer.interests.clone().unwrap_or_default(),
            action: None,
        }
    }
}

/// 日付入力欄に入れられる`YYYY-MM-DD`形式の誕生日
pub fn date_input(customer: &Customer) -> String {
    customer
        .date_of_birth
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// フォーム送信で行う操作
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Create(CustomerDraft),
    Update(Customer),
}

impl CustomerForm {
    /// 編集対象のID（空欄は登録扱い）
    pub fn editing_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn is_cancel(&self) -> bool {
        self.action.as_deref() == Some("cancel")
    }

    /// 必須項目を確認して送信内容を組み立てる
    pub fn submission(&self) -> Result<Submission, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.name = Some("Name is required".to_owned());
        }

        let date_of_birth = match self.date_of_birth.trim() {
            "" => {
                errors.date_of_birth = Some("Date of Birth is required".to_owned());
                None
            }
            value => {
                let date = parse_date(value);
                if date.is_none() {
                    errors.date_of_birth = Some("Date of Birth must be a date".to_owned());
                }
                date
            }
        };

        let member_number = match self.member_number.trim() {
            "" => {
                errors.member_number = Some("Member Number is required".to_owned());
                None
            }
            value => {
                let number = value.parse::<i64>().ok();
                if number.is_none() {
                    errors.member_number = Some("Member Number must be a number".to_owned());
                }
                number
            }
        };

        let id = match self.editing_id() {
            Some(id) => match id.parse::<CustomerId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    errors.record = Some(e.to_string());
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let interests = self.interests.trim();
        let draft = CustomerDraft {
            name: name.to_owned(),
            date_of_birth,
            member_number,
            interests: (!interests.is_empty()).then(|| interests.to_owned()),
        };
        Ok(match id {
            Some(id) => Submission::Update(Customer::new(id, draft)),
            None => Submission::Create(draft),
        })
    }
}

/// 入力欄ごとのエラー
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub member_number: Option<String>,
    pub record: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.messages().next().is_none()
    }

    fn messages(&self) -> impl Iterator<Item = &str> {
        [
            &self.name,
            &self.date_of_birth,
            &self.member_number,
            &self.record,
        ]
        .into_iter()
        .filter_map(|message| message.as_deref())
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.messages().collect::<Vec<_>>();
        f.write_str(&messages.join(", "))
    }
}

/// フォームの状態
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormState {
    /// 空のフォームで新規登録を待つ
    #[default]
    Adding,
    /// 既存の顧客を編集中
    Editing {
        id: CustomerId,
        original: CustomerForm,
    },
}

impl FormState {
    /// 一覧の行から編集を始める
    pub fn edit(customer: &Customer) -> Self {
        Self::Editing {
            id: customer.id,
            original: CustomerForm::from(customer),
        }
    }

    /// `?edit={id}`で指定された顧客を一覧から探して編集を始める
    pub fn edit_from_list(id: &str, customers: &[Customer]) -> Self {
        id.parse::<CustomerId>()
            .ok()
            .and_then(|id| customers.iter().find(|customer| customer.id == id))
            .map(Self::edit)
            .unwrap_or_default()
    }

    /// 送信されたフォームから状態を復元する
    pub fn resume(form: &CustomerForm, customers: &[Customer]) -> Self {
        match form.editing_id().map(str::parse::<CustomerId>) {
            Some(Ok(id)) => Self::Editing {
                id,
                original: customers
                    .iter()
                    .find(|customer| customer.id == id)
                    .map(CustomerForm::from)
                    .unwrap_or_else(|| form.clone()),
            },
            _ => Self::Adding,
        }
    }

    /// 編集を取り消して空の登録フォームに戻る
    pub fn cancel(&self) -> Self {
        Self::Adding
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<CustomerId> {
        match self {
            Self::Adding => None,
            Self::Editing { id, .. } => Some(*id),
        }
    }

    /// フォームに表示する初期値
    pub fn values(&self) -> CustomerForm {
        match self {
            Self::Adding => CustomerForm::default(),
            Self::Editing { original, .. } => original.clone(),
        }
    }
}
