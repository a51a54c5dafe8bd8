// db/db.rs
use sqlx::{Pool, Postgres};

#[derive(Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("pool", &"Pool<Postgres>")
            .field("size", &self.pool.size())
            .finish()
    }
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }

    /// Current pool usage for monitoring
    pub fn pool_status(&self) -> (u32, usize) {
        (self.pool.size(), self.pool.num_idle())
    }
}
