use tracing::warn;

/// 帳號層級對照表（中英文皆可，鍵一律為小寫）
static TIER_LABELS: phf::Map<&'static str, Tier> = phf::phf_map! {
    "大學部學生" => Tier::Undergrad,
    "大學部" => Tier::Undergrad,
    "undergrad" => Tier::Undergrad,
    "undergraduate" => Tier::Undergrad,
    "碩士班學生" => Tier::Master,
    "碩士生" => Tier::Master,
    "碩士" => Tier::Master,
    "master" => Tier::Master,
    "博士班學生" => Tier::Phd,
    "博士生" => Tier::Phd,
    "博士" => Tier::Phd,
    "phd" => Tier::Phd,
    "教授" => Tier::Professor,
    "professor" => Tier::Professor,
    "管理員" => Tier::Admin,
    "admin" => Tier::Admin,
};

/// 帳號層級枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Tier {
    /// 大學部學生
    Undergrad = 1,
    /// 碩士班學生
    Master = 2,
    /// 博士班學生
    Phd = 3,
    /// 教授
    Professor = 4,
    /// 管理員
    Admin = 5,
}

impl Tier {
    /// 取得 add_user.sh 使用的群組代碼（1-5）
    pub fn code(self) -> u8 {
        self as u8
    }

    /// 取得英文名稱
    pub fn name(self) -> &'static str {
        match self {
            Tier::Undergrad => "undergrad",
            Tier::Master => "master",
            Tier::Phd => "phd",
            Tier::Professor => "professor",
            Tier::Admin => "admin",
        }
    }

    /// 從群組代碼解析層級
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Tier::Undergrad),
            2 => Some(Tier::Master),
            3 => Some(Tier::Phd),
            4 => Some(Tier::Professor),
            5 => Some(Tier::Admin),
            _ => None,
        }
    }

    /// 從申請表的身份描述解析層級（精確匹配，不分大小寫）
    pub fn from_label(label: &str) -> Option<Self> {
        TIER_LABELS.get(label.trim().to_lowercase().as_str()).copied()
    }

    /// 將申請表的身份描述轉換為層級
    ///
    /// 此函數必定回傳一個層級：無法辨識的描述一律視為大學部學生。
    pub fn classify(label: &str) -> Self {
        match Self::from_label(label) {
            Some(tier) => tier,
            None => {
                warn!("⚠️ 無法辨識的身份描述 '{}'，預設為大學部學生 (1)", label);
                Tier::Undergrad
            }
        }
    }

    /// 碩士與博士申請必須填寫指導教授
    pub fn requires_advisor(self) -> bool {
        matches!(self, Tier::Master | Tier::Phd)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_chinese_labels() {
        assert_eq!(Tier::classify("大學部學生"), Tier::Undergrad);
        assert_eq!(Tier::classify("碩士班學生"), Tier::Master);
        assert_eq!(Tier::classify("博士生"), Tier::Phd);
        assert_eq!(Tier::classify("教授"), Tier::Professor);
        assert_eq!(Tier::classify("管理員"), Tier::Admin);
    }

    #[test]
    fn test_classify_english_labels() {
        assert_eq!(Tier::classify("undergraduate"), Tier::Undergrad);
        assert_eq!(Tier::classify("Master"), Tier::Master);
        assert_eq!(Tier::classify("PhD"), Tier::Phd);
        assert_eq!(Tier::classify("professor"), Tier::Professor);
        assert_eq!(Tier::classify("ADMIN"), Tier::Admin);
    }

    #[test]
    fn test_classify_trims_whitespace() {
        assert_eq!(Tier::classify("  碩士  "), Tier::Master);
        assert_eq!(Tier::classify(" phd\n"), Tier::Phd);
    }

    #[test]
    fn test_classify_is_total() {
        // 無法辨識的輸入一律回到大學部學生，絕不報錯
        assert_eq!(Tier::classify("訪問學者"), Tier::Undergrad);
        assert_eq!(Tier::classify(""), Tier::Undergrad);
        assert_eq!(Tier::classify("postdoc"), Tier::Undergrad);
    }

    #[test]
    fn test_code_roundtrip() {
        for code in 1..=5u8 {
            let tier = Tier::from_code(code).unwrap();
            assert_eq!(tier.code(), code);
        }
        assert_eq!(Tier::from_code(0), None);
        assert_eq!(Tier::from_code(6), None);
    }

    #[test]
    fn test_requires_advisor() {
        assert!(Tier::Master.requires_advisor());
        assert!(Tier::Phd.requires_advisor());
        assert!(!Tier::Undergrad.requires_advisor());
        assert!(!Tier::Professor.requires_advisor());
        assert!(!Tier::Admin.requires_advisor());
    }
}
