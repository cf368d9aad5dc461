pub const USER_VERIFICATIONS: &str = r#"SELECT v.id, v.user_address, v.task_id,
    v.proof_kind, v.proof_url, v.screenshot_path, v.user_name,
    v.additional_notes, v.status, v.submitted_at, v.verified_at,
    v.verified_by, v.reward_distributed,
    t.task_name, t.platform, t.reward
    FROM verifications v
    LEFT JOIN tasks t ON v.task_id = t.task_id
    WHERE v.user_address = $1
    ORDER BY v.submitted_at DESC"#;

pub const PENDING_VERIFICATIONS: &str = r#"SELECT v.id, v.user_address, v.task_id,
    v.proof_kind, v.proof_url, v.screenshot_path, v.user_name,
    v.additional_notes, v.status, v.submitted_at, v.verified_at,
    v.verified_by, v.reward_distributed,
    t.task_name, t.platform, t.reward
    FROM verifications v
    LEFT JOIN tasks t ON v.task_id = t.task_id
    WHERE v.status = 'pending'
    ORDER BY v.submitted_at ASC"#;

pub const REFERRAL_COUNT: &str = r#"SELECT COUNT(*) AS total_records
    FROM referral_edges
    WHERE referrer = $1"#;

pub const VERIFIED_TASK_COUNT: &str = r#"SELECT COUNT(*) AS total_records
    FROM verifications
    WHERE user_address = $1 AND status = 'verified'"#;

pub const PLATFORM_STATS: &str = r#"SELECT
    (SELECT COUNT(*) FROM users) AS total_users,
    (SELECT COUNT(*) FROM users WHERE is_active) AS active_users,
    (SELECT COALESCE(SUM(total_earned), 0) FROM users) AS total_earned,
    (SELECT COALESCE(SUM(total_withdrawn), 0) FROM users) AS total_withdrawn,
    (SELECT COUNT(*) FROM verifications WHERE status = 'pending') AS pending_verifications"#;
