use crate::error::Rejection;

/// Currency balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Adds `amount`, saturating at `u64::MAX`.
    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Removes `amount`, or rejects without touching the balance.
    pub fn spend(&mut self, amount: u64) -> Result<(), Rejection> {
        if amount > self.balance {
            return Err(Rejection::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_rejects_overdraft() {
        let mut wallet = Wallet::new(30);
        assert!(wallet.spend(20).is_ok());
        assert_eq!(
            wallet.spend(20),
            Err(Rejection::InsufficientFunds {
                needed: 20,
                available: 10
            })
        );
        assert_eq!(wallet.balance(), 10);
    }

    #[test]
    fn credit_saturates() {
        let mut wallet = Wallet::new(u64::MAX - 1);
        wallet.credit(10);
        assert_eq!(wallet.balance(), u64::MAX);
    }
}
