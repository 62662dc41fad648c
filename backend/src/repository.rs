use crate::error::DeskResult;
use crate::store::protocol::*;
use crate::utils::rpc::StoreClient;
use eventdesk_shared::{EventDocument, OperatorDocument, Session, StoredEvent};
use worker::Env;

/// Worker 侧看到的文档存储
///
/// 业务逻辑只依赖这个 trait，测试时注入 `MockRepository`
#[async_trait::async_trait(?Send)]
pub trait Repository {
    async fn list_events(&self) -> DeskResult<Vec<StoredEvent>>;
    async fn get_event(&self, id: &str) -> DeskResult<Option<EventDocument>>;
    async fn put_event(&self, id: &str, document: &EventDocument) -> DeskResult<()>;
    async fn delete_event(&self, id: &str) -> DeskResult<bool>;

    async fn list_operators(&self, seed: &[String]) -> DeskResult<Vec<OperatorDocument>>;

    async fn put_session(&self, session: &Session) -> DeskResult<()>;
    async fn get_session(&self, token: &str) -> DeskResult<Option<Session>>;
    async fn delete_session(&self, token: &str) -> DeskResult<bool>;
}

// =========================================================
// Durable Object 实现
// =========================================================

pub struct DoRepository {
    client: StoreClient,
}

impl DoRepository {
    pub fn new(env: &Env, binding_name: &str) -> DeskResult<Self> {
        let namespace = env.durable_object(binding_name)?;
        let id = namespace.id_from_name("default")?;
        let stub = id.get_stub()?;
        Ok(Self {
            client: StoreClient::new(stub),
        })
    }
}

#[async_trait::async_trait(?Send)]
impl Repository for DoRepository {
    async fn list_events(&self) -> DeskResult<Vec<StoredEvent>> {
        self.client.send(&ListEventsCmd).await
    }

    async fn get_event(&self, id: &str) -> DeskResult<Option<EventDocument>> {
        self.client.send(&GetEventCmd { id: id.to_string() }).await
    }

    async fn put_event(&self, id: &str, document: &EventDocument) -> DeskResult<()> {
        self.client
            .send(&PutEventCmd {
                id: id.to_string(),
                document: document.clone(),
            })
            .await
    }

    async fn delete_event(&self, id: &str) -> DeskResult<bool> {
        self.client
            .send(&DeleteEventCmd { id: id.to_string() })
            .await
    }

    async fn list_operators(&self, seed: &[String]) -> DeskResult<Vec<OperatorDocument>> {
        self.client
            .send(&ListOperatorsCmd {
                seed: seed.to_vec(),
            })
            .await
    }

    async fn put_session(&self, session: &Session) -> DeskResult<()> {
        self.client
            .send(&PutSessionCmd {
                session: session.clone(),
            })
            .await
    }

    async fn get_session(&self, token: &str) -> DeskResult<Option<Session>> {
        self.client
            .send(&GetSessionCmd {
                token: token.to_string(),
            })
            .await
    }

    async fn delete_session(&self, token: &str) -> DeskResult<bool> {
        self.client
            .send(&DeleteSessionCmd {
                token: token.to_string(),
            })
            .await
    }
}

// 内存 Mock 实现
#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashMap};

    pub struct MockRepository {
        pub events: RefCell<BTreeMap<String, EventDocument>>,
        pub operators: RefCell<Vec<OperatorDocument>>,
        pub sessions: RefCell<HashMap<String, Session>>,
    }

    impl MockRepository {
        pub fn new() -> Self {
            Self {
                events: RefCell::new(BTreeMap::new()),
                operators: RefCell::new(Vec::new()),
                sessions: RefCell::new(HashMap::new()),
            }
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Repository for MockRepository {
        async fn list_events(&self) -> DeskResult<Vec<StoredEvent>> {
            Ok(self
                .events
                .borrow()
                .iter()
                .map(|(id, document)| StoredEvent {
                    id: id.clone(),
                    document: document.clone(),
                })
                .collect())
        }

        async fn get_event(&self, id: &str) -> DeskResult<Option<EventDocument>> {
            Ok(self.events.borrow().get(id).cloned())
        }

        async fn put_event(&self, id: &str, document: &EventDocument) -> DeskResult<()> {
            self.events
                .borrow_mut()
                .insert(id.to_string(), document.clone());
            Ok(())
        }

        async fn delete_event(&self, id: &str) -> DeskResult<bool> {
            Ok(self.events.borrow_mut().remove(id).is_some())
        }

        async fn list_operators(&self, seed: &[String]) -> DeskResult<Vec<OperatorDocument>> {
            let mut operators = self.operators.borrow_mut();
            if operators.is_empty() {
                operators.extend(seed.iter().map(|n| OperatorDocument {
                    nombre: Some(n.clone()),
                }));
            }
            Ok(operators.clone())
        }

        async fn put_session(&self, session: &Session) -> DeskResult<()> {
            self.sessions
                .borrow_mut()
                .insert(session.token.clone(), session.clone());
            Ok(())
        }

        async fn get_session(&self, token: &str) -> DeskResult<Option<Session>> {
            Ok(self.sessions.borrow().get(token).cloned())
        }

        async fn delete_session(&self, token: &str) -> DeskResult<bool> {
            Ok(self.sessions.borrow_mut().remove(token).is_some())
        }
    }
}
