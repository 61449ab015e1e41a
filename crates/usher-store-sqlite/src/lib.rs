//! SQLite store backend.
//!
//! Maps the two-key invitation table onto a `(email, code)` primary key and
//! the status/expiry secondary index onto a covering SQL index. Timestamps
//! are stored in their canonical string form; the form is fixed-width, so
//! SQL text comparisons order chronologically. Paged reads use keyset
//! pagination (row-value comparison + LIMIT).

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use usher_storage::timestamps;
use usher_storage::{
    paginate, Invitation, InvitationPage, InvitationUpdate, InviteStatus, PageToken, PrimaryKey,
    StatusIndexKey, Store, StoreError, DEFAULT_PAGE_SIZE,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const INVITATION_COLUMNS: &str = "email, code, invite_status, created_date, expiry_date";

type InvitationRow = (String, String, String, String, String);

pub struct SqliteStore {
    pool: SqlitePool,
    page_size: usize,
}

impl SqliteStore {
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Return at most `page_size` items per paged read.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = page_size;
        self
    }

    fn limit(&self) -> i64 {
        (self.page_size + 1) as i64
    }
}

fn row_to_invitation(row: InvitationRow) -> Result<Invitation, StoreError> {
    let (email, code, status, created, expiry) = row;
    Ok(Invitation {
        email,
        code,
        invite_status: status
            .parse::<InviteStatus>()
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        created_date: timestamps::from_canonical(&created)
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        expiry_date: timestamps::from_canonical(&expiry)
            .map_err(|e| StoreError::Backend(e.to_string()))?,
    })
}

fn rows_to_invitations(rows: Vec<InvitationRow>) -> Result<Vec<Invitation>, StoreError> {
    rows.into_iter().map(row_to_invitation).collect()
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn get_invitation(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<Invitation>, StoreError> {
        let row = sqlx::query_as::<_, InvitationRow>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE email=? AND code=?"
        ))
        .bind(email)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.map(row_to_invitation).transpose()
    }

    async fn create_invitation(&self, invitation: &Invitation) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO invitations(email, code, invite_status, created_date, expiry_date)
             VALUES(?,?,?,?,?)",
        )
        .bind(&invitation.email)
        .bind(&invitation.code)
        .bind(invitation.invite_status.as_str())
        .bind(timestamps::to_canonical(&invitation.created_date))
        .bind(timestamps::to_canonical(&invitation.expiry_date))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let s = e.to_string();
            if s.contains("UNIQUE") {
                StoreError::AlreadyExists
            } else {
                StoreError::Backend(s)
            }
        })?;
        Ok(())
    }

    async fn update_invitation(
        &self,
        email: &str,
        code: &str,
        update: &InvitationUpdate,
    ) -> Result<Option<Invitation>, StoreError> {
        let Some(status) = update.invite_status else {
            // Nothing to change; the keyed read doubles as the existence check.
            return self.get_invitation(email, code).await;
        };

        let result = sqlx::query("UPDATE invitations SET invite_status=? WHERE email=? AND code=?")
            .bind(status.as_str())
            .bind(email)
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_invitation(email, code).await
    }

    async fn scan_invitations(
        &self,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        let rows = match start {
            Some(token) => {
                let key: PrimaryKey = token.decode()?;
                sqlx::query_as::<_, InvitationRow>(&format!(
                    "SELECT {INVITATION_COLUMNS} FROM invitations
                     WHERE (email, code) > (?, ?) ORDER BY email, code LIMIT ?"
                ))
                .bind(key.email)
                .bind(key.code)
                .bind(self.limit())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, InvitationRow>(&format!(
                    "SELECT {INVITATION_COLUMNS} FROM invitations ORDER BY email, code LIMIT ?"
                ))
                .bind(self.limit())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        paginate(rows_to_invitations(rows)?, self.page_size, |inv| PrimaryKey {
            email: inv.email.clone(),
            code: inv.code.clone(),
        })
    }

    async fn query_by_email(
        &self,
        email: &str,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        let rows = match start {
            Some(token) => {
                let key: PrimaryKey = token.decode()?;
                sqlx::query_as::<_, InvitationRow>(&format!(
                    "SELECT {INVITATION_COLUMNS} FROM invitations
                     WHERE email=? AND code>? ORDER BY code LIMIT ?"
                ))
                .bind(email)
                .bind(key.code)
                .bind(self.limit())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, InvitationRow>(&format!(
                    "SELECT {INVITATION_COLUMNS} FROM invitations
                     WHERE email=? ORDER BY code LIMIT ?"
                ))
                .bind(email)
                .bind(self.limit())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        paginate(rows_to_invitations(rows)?, self.page_size, |inv| PrimaryKey {
            email: inv.email.clone(),
            code: inv.code.clone(),
        })
    }

    async fn query_by_status(
        &self,
        status: InviteStatus,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        let rows = match start {
            Some(token) => {
                let key: StatusIndexKey = token.decode()?;
                sqlx::query_as::<_, InvitationRow>(&format!(
                    "SELECT {INVITATION_COLUMNS} FROM invitations
                     WHERE invite_status=? AND (expiry_date, email, code) > (?, ?, ?)
                     ORDER BY expiry_date, email, code LIMIT ?"
                ))
                .bind(status.as_str())
                .bind(key.expiry_date)
                .bind(key.email)
                .bind(key.code)
                .bind(self.limit())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, InvitationRow>(&format!(
                    "SELECT {INVITATION_COLUMNS} FROM invitations
                     WHERE invite_status=? ORDER BY expiry_date, email, code LIMIT ?"
                ))
                .bind(status.as_str())
                .bind(self.limit())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        paginate(rows_to_invitations(rows)?, self.page_size, |inv| {
            StatusIndexKey {
                expiry_date: timestamps::to_canonical(&inv.expiry_date),
                email: inv.email.clone(),
                code: inv.code.clone(),
            }
        })
    }
}
