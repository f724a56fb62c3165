use meibo::domain::customer::Customer;
use minijinja::{context, Environment, Error};
use serde::Serialize;

use super::form::{date_input, CustomerForm, FormErrors, FormState};

static BASE: &str = include_str!("../../templates/base.html");
static LIST: &str = include_str!("../../templates/list.html");
static DETAIL: &str = include_str!("../../templates/detail.html");
static ERROR: &str = include_str!("../../templates/error.html");

/// 詳細画面で誕生日が未登録の場合の表示
pub static MISSING_DATE: &str = "N/A";

fn environment() -> Result<Environment<'static>, Error> {
    let mut env = Environment::new();
    env.add_template("base.html", BASE)?;
    env.add_template("list.html", LIST)?;
    env.add_template("detail.html", DETAIL)?;
    env.add_template("error.html", ERROR)?;
    Ok(env)
}

/// 一覧の1行
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub date_of_birth: String,
    pub member_number: String,
    pub interests: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name.clone(),
            date_of_birth: date_input(customer),
            member_number: customer
                .member_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            interests: customer.interests.clone().unwrap_or_default(),
        }
    }
}

/// 詳細画面の状態
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailView {
    /// 取得が完了していない
    Loading,
    Found(Customer),
    NotFound,
}

pub fn list(
    customers: &[Customer],
    state: &FormState,
    form: &CustomerForm,
    errors: &FormErrors,
) -> Result<String, Error> {
    let rows = customers.iter().map(CustomerRow::from).collect::<Vec<_>>();
    environment()?.get_template("list.html")?.render(context! {
        rows => rows,
        editing => state.is_editing(),
        edit_id => state.editing_id().map(|id| id.to_string()),
        form => form,
        errors => errors,
    })
}

pub fn detail(view: &DetailView) -> Result<String, Error> {
    let env = environment()?;
    let template = env.get_template("detail.html")?;
    match view {
        DetailView::Loading => template.render(context! { state => "loading" }),
        DetailView::NotFound => template.render(context! { state => "not_found" }),
        DetailView::Found(customer) => template.render(context! {
            state => "found",
            name => &customer.name,
            date_of_birth => customer
                .date_of_birth
                .map(|date| date.format("%-m/%-d/%Y").to_string())
                .unwrap_or_else(|| MISSING_DATE.to_owned()),
            member_number => customer
                .member_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            interests => customer.interests.as_deref().unwrap_or_default(),
        }),
    }
}

pub fn error(message: &str) -> Result<String, Error> {
    environment()?
        .get_template("error.html")?
        .render(context! { message => message })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use meibo::domain::customer::{CustomerDraft, CustomerId};

    use super::*;

    fn alice() -> Customer {
        Customer::new(
            CustomerId::from(7),
            CustomerDraft {
                name: "Alice".to_owned(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
                member_number: Some(42),
                interests: Some("chess".to_owned()),
            },
        )
    }

    #[test]
    fn test_row_from_customer() {
        assert_eq!(
            CustomerRow::from(&alice()),
            CustomerRow {
                id: "7".to_owned(),
                name: "Alice".to_owned(),
                date_of_birth: "1990-01-01".to_owned(),
                member_number: "42".to_owned(),
                interests: "chess".to_owned(),
            }
        );
        let bare = Customer::new(CustomerId::from(8), CustomerDraft::default());
        assert_eq!(CustomerRow::from(&bare).date_of_birth, "");
    }

    #[test]
    fn test_list_adding() {
        let html = list(
            &[alice()],
            &FormState::Adding,
            &CustomerForm::default(),
            &FormErrors::default(),
        )
        .unwrap();
        assert!(html.contains(r#"value="Add""#));
        assert!(!html.contains(r#"name="_id""#));
        assert!(html.contains(r#"<a href="/customer/7">Alice</a>"#));
        assert!(html.contains("1990-01-01"));
        assert!(html.contains(r#"href="/customer?edit=7""#));
        assert!(html.contains(r#"action="/customer/7/delete""#));
        assert!(html.contains("Are you sure to delete [Alice]"));
    }

    #[test]
    fn test_list_editing() {
        let state = FormState::edit(&alice());
        let html = list(&[alice()], &state, &state.values(), &FormErrors::default()).unwrap();
        assert!(html.contains(r#"value="Update""#));
        assert!(html.contains("Cancel"));
        assert!(html.contains(r#"<input type="hidden" name="_id" value="7">"#));
        assert!(html.contains(r#"value="Alice""#));
        assert!(html.contains(r#"value="chess""#));
    }

    #[test]
    fn test_list_errors() {
        let errors = CustomerForm::default().submission().unwrap_err();
        let html = list(&[], &FormState::Adding, &CustomerForm::default(), &errors).unwrap();
        assert!(html.contains("Name is required"));
        assert!(html.contains("Member Number is required"));
        assert!(html.contains("No customers"));
    }

    #[test]
    fn test_list_escapes_names() {
        let mut customer = alice();
        customer.name = "<script>alert('x')</script>".to_owned();
        let html = list(
            &[customer],
            &FormState::Adding,
            &CustomerForm::default(),
            &FormErrors::default(),
        )
        .unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_detail() {
        let html = detail(&DetailView::Found(alice())).unwrap();
        assert!(html.contains("Customer Details"));
        assert!(html.contains("Alice"));
        // HTML出力では`/`がエスケープされる
        assert!(html.contains("1&#x2f;1&#x2f;1990"));
        assert!(html.contains("42"));
        assert!(html.contains("chess"));
        assert!(html.contains(r#"href="/customer""#));

        let mut customer = alice();
        customer.date_of_birth = None;
        let html = detail(&DetailView::Found(customer)).unwrap();
        assert!(html.contains(MISSING_DATE));
    }

    #[test]
    fn test_detail_placeholders() {
        let html = detail(&DetailView::Loading).unwrap();
        assert!(html.contains("Loading customer details..."));
        let html = detail(&DetailView::NotFound).unwrap();
        assert!(html.contains("Customer not found"));
    }

    #[test]
    fn test_error() {
        let html = error("Record service answered 500").unwrap();
        assert!(html.contains("Record service answered 500"));
    }
}
