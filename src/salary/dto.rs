use serde::{Deserialize, Serialize};

/// Request body for assigning a rate to an employee.
#[derive(Debug, Deserialize)]
pub struct SetRateRequest {
    pub employee_id: i64,
    pub current_rate: f64,
    pub rate_increase_period: i32,
}

/// Response for the caller's own next pay raise. Wire keys carry spaces.
#[derive(Debug, Serialize)]
pub struct NextPayRaise {
    #[serde(rename = "current rate")]
    pub current_rate: f64,
    #[serde(rename = "next raise date")]
    pub next_raise_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_pay_raise_uses_the_spaced_wire_keys() {
        let json = serde_json::to_string(&NextPayRaise {
            current_rate: 50000.0,
            next_raise_date: "14.04.2024".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"current rate":50000.0,"next raise date":"14.04.2024"}"#
        );
    }

    #[test]
    fn set_rate_request_deserializes() {
        let req: SetRateRequest = serde_json::from_str(
            r#"{"employee_id": 2, "current_rate": 50000, "rate_increase_period": 90}"#,
        )
        .unwrap();
        assert_eq!(req.employee_id, 2);
        assert_eq!(req.current_rate, 50000.0);
        assert_eq!(req.rate_increase_period, 90);
    }
}
