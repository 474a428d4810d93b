//! Operation builders
//!
//! Every builder validates its inputs before any network call and returns a
//! `BuildResult` without submitting. The `*_and_submit` style is left to the
//! caller: `orchestrator.submit(orchestrator.build_stake(..).await?)`.

use super::params::{BuildResult, ContractCallParams, Destination, MethodRef, Operation, TokenTransfer, TransferParams};
use super::Orchestrator;
use crate::error::{SdkError, SdkResult};
use crate::provider::ContractKind;
use ayin_core::codec::{Address, ContractId, Val};
use ayin_core::math::{max_amount_in, min_amount_out, safe_add, safe_mul};
use ayin_core::{
    CoreError, PairState, Protocol, SwapSide, TokenId, ALPH_TOKEN, DUST_AMOUNT, MIN_ALPH_FOR_CLAIM_UNSTAKE,
    ONE_ALPH, PRECISION, STAKE_ALPH_AMOUNT, TOP_UP_REWARDS_METHOD_INDEX, U256,
};

/// ALPH attached to pair calls on top of any ALPH leg
fn pair_call_dust() -> U256 {
    DUST_AMOUNT * U256::new(2)
}

fn require_positive(amount: U256, what: &'static str) -> SdkResult<()> {
    if amount == U256::ZERO {
        return Err(CoreError::InvalidInput(what).into());
    }
    Ok(())
}

fn parse_address(text: &str) -> SdkResult<Address> {
    Ok(Address::parse(text)?)
}

fn parse_token(text: &str) -> SdkResult<ContractId> {
    Ok(ContractId::from_hex(text)?)
}

/// ALPH and token approvals for selling `amount` of `token_in` to a pair.
/// Selling ALPH attaches one extra ALPH instead of the pair-call dust.
fn swap_attachment(token_in: &TokenId, amount: U256) -> SdkResult<(U256, Vec<TokenTransfer>)> {
    if *token_in == ALPH_TOKEN {
        return Ok((safe_add(amount, ONE_ALPH)?, Vec::new()));
    }
    Ok((pair_call_dust(), vec![TokenTransfer::new(token_in.to_hex(), amount)]))
}

/// Split pair legs into the ALPH attachment and token approvals
fn attach_legs(legs: &[(TokenId, U256)]) -> SdkResult<(U256, Vec<TokenTransfer>)> {
    let mut atto_alph = pair_call_dust();
    let mut tokens = Vec::new();
    for (token, amount) in legs {
        if *token == ALPH_TOKEN {
            atto_alph = safe_add(atto_alph, *amount)?;
        } else {
            tokens.push(TokenTransfer::new(token.to_hex(), *amount));
        }
    }
    Ok((atto_alph, tokens))
}

impl Orchestrator {
    fn call(
        &self,
        signer: Address,
        contract_address: Address,
        contract: ContractKind,
        method: MethodRef,
        args: Vec<Val>,
    ) -> ContractCallParams {
        ContractCallParams {
            signer_address: signer,
            contract_address,
            contract,
            method,
            args,
            atto_alph_amount: U256::ZERO,
            tokens: Vec::new(),
        }
    }

    /// AYIN id, paid out as the staking reward on unstake and claim
    fn reward_token(&self) -> SdkResult<String> {
        Ok(parse_token(&self.config().contracts.ayin_token_id)?.to_hex())
    }

    // ========================================================================
    // Staking
    // ========================================================================

    /// Stake `amount` LP tokens; attaches the 1 ALPH StakingAccount deposit
    pub async fn build_stake(&self, contract: &Address, protocol: Protocol, amount: U256) -> SdkResult<BuildResult> {
        require_positive(amount, "stake amount must be positive")?;
        let signer = self.signer_address().await?;
        let lp_token = self.accountant().lp_token_id(contract, protocol).await?;

        let mut params = self.call(
            signer,
            contract.clone(),
            ContractKind::from_protocol(protocol),
            MethodRef::Named("stake"),
            vec![Val::u256(amount)],
        );
        params.atto_alph_amount = STAKE_ALPH_AMOUNT;
        params.tokens = vec![TokenTransfer::new(lp_token.to_hex(), amount)];
        Ok(BuildResult::new(Operation::Stake, params))
    }

    pub async fn build_unstake(&self, contract: &Address, protocol: Protocol, amount: U256) -> SdkResult<BuildResult> {
        require_positive(amount, "unstake amount must be positive")?;
        let signer = self.signer_address().await?;
        let mut params = self.call(
            signer,
            contract.clone(),
            ContractKind::from_protocol(protocol),
            MethodRef::Named("unstake"),
            vec![Val::u256(amount)],
        );
        params.atto_alph_amount = MIN_ALPH_FOR_CLAIM_UNSTAKE;
        Ok(BuildResult::new(Operation::Unstake, params).with_payout_token(self.reward_token()?))
    }

    pub async fn build_claim_rewards(&self, contract: &Address, protocol: Protocol) -> SdkResult<BuildResult> {
        let signer = self.signer_address().await?;
        let mut params = self.call(
            signer,
            contract.clone(),
            ContractKind::from_protocol(protocol),
            MethodRef::Named("claimRewards"),
            Vec::new(),
        );
        params.atto_alph_amount = MIN_ALPH_FOR_CLAIM_UNSTAKE;
        Ok(BuildResult::new(Operation::ClaimRewards, params).with_payout_token(self.reward_token()?))
    }

    /// Add `amount` raw AYIN to the single ALPH/AYIN reward pool
    pub async fn build_top_up_rewards_raw(&self, amount: U256) -> SdkResult<BuildResult> {
        require_positive(amount, "top-up amount must be positive")?;
        let signer = self.signer_address().await?;
        let contracts = &self.config().contracts;
        let staking = parse_address(&contracts.single_alphayin_stake)?;
        let ayin = parse_token(&contracts.ayin_token_id)?;
        let protocol = self
            .config()
            .staking_by_address(staking.as_str())
            .map(|d| d.protocol)
            .unwrap_or(Protocol::StakingV4);

        let mut params = self.call(
            signer,
            staking,
            ContractKind::from_protocol(protocol),
            MethodRef::Index(TOP_UP_REWARDS_METHOD_INDEX),
            vec![Val::u256(amount)],
        );
        params.atto_alph_amount = DUST_AMOUNT;
        params.tokens = vec![TokenTransfer::new(ayin.to_hex(), amount)];
        Ok(BuildResult::new(Operation::TopUpRewards, params))
    }

    /// Add `whole_ayin` AYIN, scaled by 10^18
    pub async fn build_top_up_rewards(&self, whole_ayin: U256) -> SdkResult<BuildResult> {
        require_positive(whole_ayin, "top-up amount must be positive")?;
        self.build_top_up_rewards_raw(safe_mul(whole_ayin, PRECISION)?).await
    }

    // ========================================================================
    // Pools
    // ========================================================================

    /// Sell exactly `amount_in` of `token_in`, accepting the quoted output
    /// minus the configured slippage
    pub async fn build_swap_exact_in(&self, pair: &PairState, token_in: &TokenId, amount_in: U256) -> SdkResult<BuildResult> {
        require_positive(amount_in, "swap amount must be positive")?;
        let quoted = pair.quote_exact_in(token_in, amount_in)?;
        let min_out = min_amount_out(quoted, self.config().slippage_bps)?;
        let (amounts, token_out) = match pair.side_for_input(token_in)? {
            SwapSide::ZeroForOne => ([amount_in, U256::ZERO, U256::ZERO, min_out], pair.token1),
            SwapSide::OneForZero => ([U256::ZERO, amount_in, min_out, U256::ZERO], pair.token0),
        };
        let attachment = swap_attachment(token_in, amount_in)?;
        self.build_swap(pair, amounts, attachment, token_out).await
    }

    /// Buy exactly `amount_out` of `token_out`. The pair is sent the quoted
    /// input; the approval covers the quote plus the configured slippage.
    pub async fn build_swap_exact_out(&self, pair: &PairState, token_out: &TokenId, amount_out: U256) -> SdkResult<BuildResult> {
        require_positive(amount_out, "swap amount must be positive")?;
        let quoted = pair.quote_exact_out(token_out, amount_out)?;
        let max_in = max_amount_in(quoted, self.config().slippage_bps)?;
        let (amounts, token_in) = match pair.side_for_input(token_out)? {
            // Buying token0 sells token1
            SwapSide::ZeroForOne => ([U256::ZERO, quoted, amount_out, U256::ZERO], pair.token1),
            SwapSide::OneForZero => ([quoted, U256::ZERO, U256::ZERO, amount_out], pair.token0),
        };
        let attachment = swap_attachment(&token_in, max_in)?;
        self.build_swap(pair, amounts, attachment, *token_out).await
    }

    async fn build_swap(
        &self,
        pair: &PairState,
        [amount0_in, amount1_in, amount0_out, amount1_out]: [U256; 4],
        (atto_alph, tokens): (U256, Vec<TokenTransfer>),
        token_out: TokenId,
    ) -> SdkResult<BuildResult> {
        let signer = self.signer_address().await?;
        tracing::debug!(pair = %pair.pair_id, token_out = %token_out, "building swap");

        let mut params = self.call(
            signer.clone(),
            pair.pair_id.to_address(),
            ContractKind::TokenPair,
            MethodRef::Named("swap"),
            vec![
                Val::address(signer.as_str()),
                Val::address(signer.as_str()),
                Val::u256(amount0_in),
                Val::u256(amount1_in),
                Val::u256(amount0_out),
                Val::u256(amount1_out),
            ],
        );
        params.atto_alph_amount = atto_alph;
        params.tokens = tokens;
        Ok(BuildResult::new(Operation::Swap, params))
    }

    pub async fn build_add_liquidity(&self, pair: &PairState, amount0: U256, amount1: U256) -> SdkResult<BuildResult> {
        require_positive(amount0, "liquidity amounts must be positive")?;
        require_positive(amount1, "liquidity amounts must be positive")?;
        // Rejects deposits that would mint nothing
        let minted = pair.preview_mint(amount0, amount1)?;
        if minted == U256::ZERO {
            return Err(SdkError::InvalidParameters("deposit too small to mint liquidity".into()));
        }

        let signer = self.signer_address().await?;
        let (atto_alph, tokens) = attach_legs(&[(pair.token0, amount0), (pair.token1, amount1)])?;
        let mut params = self.call(
            signer.clone(),
            pair.pair_id.to_address(),
            ContractKind::TokenPair,
            MethodRef::Named("mint"),
            vec![Val::address(signer.as_str()), Val::u256(amount0), Val::u256(amount1)],
        );
        params.atto_alph_amount = atto_alph;
        params.tokens = tokens;
        Ok(BuildResult::new(Operation::AddLiquidity, params))
    }

    pub async fn build_remove_liquidity(&self, pair: &PairState, liquidity: U256) -> SdkResult<BuildResult> {
        require_positive(liquidity, "liquidity must be positive")?;
        pair.preview_burn(liquidity)?;

        let signer = self.signer_address().await?;
        let mut params = self.call(
            signer.clone(),
            pair.pair_id.to_address(),
            ContractKind::TokenPair,
            MethodRef::Named("burn"),
            vec![Val::address(signer.as_str()), Val::u256(liquidity)],
        );
        params.atto_alph_amount = pair_call_dust();
        params.tokens = vec![TokenTransfer::new(pair.lp_token_id().to_hex(), liquidity)];
        Ok(BuildResult::new(Operation::RemoveLiquidity, params))
    }

    // ========================================================================
    // xAYIN and Vault
    // ========================================================================

    /// Lock AYIN for xAYIN
    pub async fn build_mint_xayin(&self, amount: U256) -> SdkResult<BuildResult> {
        require_positive(amount, "mint amount must be positive")?;
        let signer = self.signer_address().await?;
        let contracts = &self.config().contracts;
        let liquid_staking = parse_address(&contracts.xayin_liquid_staking)?;
        let ayin = parse_token(&contracts.ayin_token_id)?;

        let mut params = self.call(
            signer,
            liquid_staking,
            ContractKind::LiquidStaking,
            MethodRef::Named("mint"),
            vec![Val::u256(amount)],
        );
        params.tokens = vec![TokenTransfer::new(ayin.to_hex(), amount)];
        Ok(BuildResult::new(Operation::MintXAyin, params))
    }

    /// Redeem xAYIN; the xAYIN token id is the liquid staking contract id
    pub async fn build_burn_xayin(&self, x_amount: U256) -> SdkResult<BuildResult> {
        require_positive(x_amount, "burn amount must be positive")?;
        let signer = self.signer_address().await?;
        let liquid_staking = parse_address(&self.config().contracts.xayin_liquid_staking)?;
        let xayin = ContractId::from_address(&liquid_staking)?;

        let mut params = self.call(
            signer,
            liquid_staking,
            ContractKind::LiquidStaking,
            MethodRef::Named("burn"),
            vec![Val::u256(x_amount)],
        );
        params.tokens = vec![TokenTransfer::new(xayin.to_hex(), x_amount)];
        Ok(BuildResult::new(Operation::BurnXAyin, params))
    }

    /// Deposit ALPH/AYIN LP tokens into the compounding vault
    pub async fn build_vault_deposit(&self, amount: U256) -> SdkResult<BuildResult> {
        require_positive(amount, "deposit amount must be positive")?;
        let signer = self.signer_address().await?;
        let contracts = &self.config().contracts;
        let vault = parse_address(&contracts.pounder_vault)?;
        let lp = parse_token(&contracts.alphayin_token_id)?;

        let mut params = self.call(signer, vault, ContractKind::Vault, MethodRef::Named("deposit"), vec![Val::u256(amount)]);
        params.tokens = vec![TokenTransfer::new(lp.to_hex(), amount)];
        Ok(BuildResult::new(Operation::VaultDeposit, params))
    }

    /// Redeem vault shares; the share token id is the vault contract id
    pub async fn build_vault_withdraw(&self, shares: U256) -> SdkResult<BuildResult> {
        require_positive(shares, "share amount must be positive")?;
        let signer = self.signer_address().await?;
        let vault = parse_address(&self.config().contracts.pounder_vault)?;
        let share_token = ContractId::from_address(&vault)?;

        let mut params = self.call(signer, vault, ContractKind::Vault, MethodRef::Named("withdraw"), vec![Val::u256(shares)]);
        params.tokens = vec![TokenTransfer::new(share_token.to_hex(), shares)];
        Ok(BuildResult::new(Operation::VaultWithdraw, params))
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Transfer ALPH or a token to `to`. Token transfers carry dust ALPH.
    pub async fn build_transfer(&self, to: &Address, token: &TokenId, amount: U256) -> SdkResult<TransferParams> {
        require_positive(amount, "transfer amount must be positive")?;
        let signer = self.signer_address().await?;
        let destination = if *token == ALPH_TOKEN {
            Destination { address: to.clone(), atto_alph_amount: amount, tokens: Vec::new() }
        } else {
            Destination {
                address: to.clone(),
                atto_alph_amount: DUST_AMOUNT,
                tokens: vec![TokenTransfer::new(token.to_hex(), amount)],
            }
        };
        Ok(TransferParams { signer_address: signer, destinations: vec![destination] })
    }

    /// Transfer to the configured donation address
    pub async fn build_donation(&self, token: &TokenId, amount: U256) -> SdkResult<TransferParams> {
        let donation = parse_address(&self.config().contracts.donation)?;
        self.build_transfer(&donation, token, amount).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_legs_splits_alph() {
        let token = ContractId::new([9u8; 32]);
        let (alph, tokens) = attach_legs(&[(ALPH_TOKEN, U256::new(5)), (token, U256::new(7))]).unwrap();
        assert_eq!(alph, pair_call_dust() + U256::new(5));
        assert_eq!(tokens, vec![TokenTransfer::new(token.to_hex(), U256::new(7))]);

        let (alph, tokens) = attach_legs(&[]).unwrap();
        assert_eq!(alph, U256::new(2_000_000_000_000_000));
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_swap_attachment_by_input_token() {
        let (alph, tokens) = swap_attachment(&ALPH_TOKEN, U256::new(5)).unwrap();
        assert_eq!(alph, ONE_ALPH + U256::new(5));
        assert!(tokens.is_empty());

        let token = ContractId::new([9u8; 32]);
        let (alph, tokens) = swap_attachment(&token, U256::new(5)).unwrap();
        assert_eq!(alph, pair_call_dust());
        assert_eq!(tokens, vec![TokenTransfer::new(token.to_hex(), U256::new(5))]);
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive(U256::ONE, "x").is_ok());
        assert!(matches!(
            require_positive(U256::ZERO, "x"),
            Err(SdkError::Core(CoreError::InvalidInput("x")))
        ));
    }
}
