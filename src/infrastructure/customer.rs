use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use meilisearch_sdk::{
    documents::DocumentsQuery, indexes::Index, task_info::TaskInfo, tasks::Task, Client,
};
use tokio::sync::RwLock;

use crate::domain::customer::{Customer, CustomerDraft, CustomerId, CustomerRepository};
use crate::domain::{DataAccessError, Entity, IdGenerator};
use crate::infrastructure::{is_not_found, next_id};

static PRIMARY_KEY: &str = "_id";
const PAGE_SIZE: usize = 1000;

pub struct MeiliCustomerRepository {
    client: Client,
    index: String,
    id_generator: Mutex<IdGenerator>,
}

impl MeiliCustomerRepository {
    pub fn new(client: Client, index: impl Into<String>, id_generator: IdGenerator) -> Self {
        Self {
            client,
            index: index.into(),
            id_generator: Mutex::new(id_generator),
        }
    }

    fn index(&self) -> Index {
        self.client.index(&self.index)
    }

    async fn wait_for_completion(&self, task_info: TaskInfo) -> Result<(), DataAccessError> {
        loop {
            match self.client.wait_for_task(&task_info, None, None).await {
                Ok(Task::Succeeded { .. }) => return Ok(()),
                Ok(task @ Task::Failed { .. }) => {
                    return Err(DataAccessError::WriteError(format!("{:?}", task).into()))
                }
                Ok(_) => continue,
                Err(meilisearch_sdk::errors::Error::Timeout) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[async_trait]
impl CustomerRepository for MeiliCustomerRepository {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        match self.index().get_document::<Customer>(&id.to_string()).await {
            Ok(customer) => Ok(Some(customer)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError> {
        let index = self.index();
        let mut customers = Vec::new();
        loop {
            let mut query = DocumentsQuery::new(&index);
            query.with_offset(customers.len()).with_limit(PAGE_SIZE);
            let page = match query.execute::<Customer>().await {
                Ok(page) => page,
                Err(e) if is_not_found(&e) => break,
                Err(e) => return Err(e.into()),
            };
            let fetched = page.results.len();
            customers.extend(page.results);
            if fetched < PAGE_SIZE {
                break;
            }
        }
        Ok(customers)
    }

    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, DataAccessError> {
        let customer = Customer::new(next_id(&self.id_generator)?, draft);
        let task = self
            .index()
            .add_documents(&[customer.clone()], Some(PRIMARY_KEY))
            .await?;
        self.wait_for_completion(task).await?;
        Ok(customer)
    }

    // Meilisearchに条件付き書き込みはないため、確認と書き込みの間に削除された顧客は復活し得る
    async fn replace(&self, customer: Customer) -> Result<Option<Customer>, DataAccessError> {
        if self.find_by_id(customer.id()).await?.is_none() {
            return Ok(None);
        }
        let task = self
            .index()
            .add_or_replace(&[customer.clone()], Some(PRIMARY_KEY))
            .await?;
        self.wait_for_completion(task).await?;
        Ok(Some(customer))
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        let Some(customer) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let task = self.index().delete_document(id).await?;
        self.wait_for_completion(task).await?;
        Ok(Some(customer))
    }
}

/// プロセス内に顧客を保持するリポジトリ
///
/// IDは採番順に増加するため、一覧は登録順に並ぶ。
pub struct InMemoryCustomerRepository {
    customers: RwLock<BTreeMap<CustomerId, Customer>>,
    id_generator: Mutex<IdGenerator>,
}

impl InMemoryCustomerRepository {
    pub fn new(id_generator: IdGenerator) -> Self {
        Self {
            customers: RwLock::new(BTreeMap::new()),
            id_generator: Mutex::new(id_generator),
        }
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError> {
        Ok(self.customers.read().await.values().cloned().collect())
    }

    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, DataAccessError> {
        let customer = Customer::new(next_id(&self.id_generator)?, draft);
        self.customers
            .write()
            .await
            .insert(customer.id(), customer.clone());
        Ok(customer)
    }

    async fn replace(&self, customer: Customer) -> Result<Option<Customer>, DataAccessError> {
        let mut customers = self.customers.write().await;
        match customers.get_mut(&customer.id()) {
            Some(stored) => {
                *stored = customer.clone();
                Ok(Some(customer))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        Ok(self.customers.write().await.remove(&id))
    }
}
