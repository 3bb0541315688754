//! Shared test harness: two stations on two simulated chains, joined by a
//! mock message channel that records an outbox and delivers on request.

#![allow(dead_code)]

use common::channel::{ChannelQuoteResponse, SendReceipt};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response,
    StdError, StdResult, Uint128, WasmMsg,
};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};
use cw_storage_plus::{Item, Map};

use station::msg::{
    ExecuteMsg, InstantiateMsg, LockedBalanceResponse, QueryMsg, QuoteResponse, TransferRequest,
};

pub const CHAIN_A: u32 = 30101;
pub const CHAIN_B: u32 = 30202;
pub const FEE_DENOM: &str = "uluna";
pub const CHANNEL_BASE_FEE: u128 = 1_000;
pub const CHANNEL_BYTE_FEE: u128 = 10;
pub const CHANNEL_ALT_FEE: u128 = 500;

// ============================================================================
// Mock Message Channel
// ============================================================================

pub mod mock_channel {
    use super::*;

    #[cw_serde]
    pub struct InstantiateMsg {
        pub chain: u32,
        pub fee_denom: String,
    }

    #[cw_serde]
    pub enum ExecuteMsg {
        Send {
            dest_chain: u32,
            payload: Binary,
            options: Binary,
            refund_address: String,
            pay_in_alt_asset: bool,
        },
        /// Test hook: deliver a message to `station` as if verified
        Deliver {
            station: String,
            src_chain: u32,
            sender: String,
            nonce: u64,
            payload: Binary,
        },
    }

    #[cw_serde]
    pub enum QueryMsg {
        Quote {
            dest_chain: u32,
            payload: Binary,
            options: Binary,
            pay_in_alt_asset: bool,
        },
        Outbox {},
    }

    #[cw_serde]
    pub struct Packet {
        pub src_chain: u32,
        pub dest_chain: u32,
        pub sender: String,
        pub nonce: u64,
        pub payload: Binary,
    }

    const SETTINGS: Item<InstantiateMsg> = Item::new("settings");
    const NONCES: Map<u32, u64> = Map::new("nonces");
    const OUTBOX: Item<Vec<Packet>> = Item::new("outbox");

    fn quote(payload: &Binary, pay_in_alt_asset: bool) -> ChannelQuoteResponse {
        ChannelQuoteResponse {
            native_fee: Uint128::new(CHANNEL_BASE_FEE + CHANNEL_BYTE_FEE * payload.len() as u128),
            alt_fee: if pay_in_alt_asset {
                Uint128::new(CHANNEL_ALT_FEE)
            } else {
                Uint128::zero()
            },
        }
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        SETTINGS.save(deps.storage, &msg)?;
        OUTBOX.save(deps.storage, &vec![])?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ExecuteMsg::Send {
                dest_chain,
                payload,
                pay_in_alt_asset,
                ..
            } => {
                let settings = SETTINGS.load(deps.storage)?;
                let fee = quote(&payload, pay_in_alt_asset);
                let paid: Uint128 = info
                    .funds
                    .iter()
                    .filter(|c| c.denom == settings.fee_denom)
                    .map(|c| c.amount)
                    .sum();
                if paid < fee.native_fee {
                    return Err(StdError::generic_err("channel fee not paid"));
                }

                let nonce = NONCES.may_load(deps.storage, dest_chain)?.unwrap_or(0) + 1;
                NONCES.save(deps.storage, dest_chain, &nonce)?;

                let mut outbox = OUTBOX.load(deps.storage)?;
                outbox.push(Packet {
                    src_chain: settings.chain,
                    dest_chain,
                    sender: info.sender.to_string(),
                    nonce,
                    payload,
                });
                OUTBOX.save(deps.storage, &outbox)?;

                Ok(Response::new().set_data(to_json_binary(&SendReceipt {
                    guid: Binary::from(nonce.to_be_bytes().to_vec()),
                    nonce,
                })?))
            }
            ExecuteMsg::Deliver {
                station: station_addr,
                src_chain,
                sender,
                nonce,
                payload,
            } => Ok(Response::new().add_message(WasmMsg::Execute {
                contract_addr: station_addr,
                msg: to_json_binary(&station::msg::ExecuteMsg::OnMessage {
                    src_chain,
                    sender,
                    nonce,
                    payload,
                })?,
                funds: vec![],
            })),
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        match msg {
            QueryMsg::Quote {
                payload,
                pay_in_alt_asset,
                ..
            } => to_json_binary(&quote(&payload, pay_in_alt_asset)),
            QueryMsg::Outbox {} => to_json_binary(&OUTBOX.load(deps.storage)?),
        }
    }
}

// ============================================================================
// Contract Wrappers
// ============================================================================

pub fn contract_station() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        station::contract::execute,
        station::contract::instantiate,
        station::contract::query,
    )
    .with_reply(station::contract::reply);
    Box::new(contract)
}

pub fn contract_fee_manager() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        fee_manager::contract::execute,
        fee_manager::contract::instantiate,
        fee_manager::contract::query,
    );
    Box::new(contract)
}

pub fn contract_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

pub fn contract_channel() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        mock_channel::execute,
        mock_channel::instantiate,
        mock_channel::query,
    );
    Box::new(contract)
}

// ============================================================================
// Test Environment
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Contracts deployed on one simulated chain
pub struct Chain {
    pub id: u32,
    pub channel: Addr,
    pub station: Addr,
    pub fee_manager: Addr,
    /// The default stablecoin: origin asset on A, wrapped on B
    pub token: Addr,
}

pub struct TestEnv {
    pub app: App,
    pub admin: Addr,
    pub user: Addr,
    pub protocol: Addr,
    pub relayer: Addr,
    pub cw20_code: u64,
    pub a: Chain,
    pub b: Chain,
}

pub const USER_BALANCE: u128 = 100_000_000_000;

pub fn setup() -> TestEnv {
    let mut app = App::default();
    let admin = Addr::unchecked("terra1admin");
    let user = Addr::unchecked("terra1user");
    let protocol = Addr::unchecked("terra1protocol");
    let relayer = Addr::unchecked("terra1relayer");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &user, coins(10_000_000_000, FEE_DENOM))
            .unwrap();
        router
            .bank
            .init_balance(storage, &admin, coins(10_000_000_000, FEE_DENOM))
            .unwrap();
    });

    let station_code = app.store_code(contract_station());
    let fee_manager_code = app.store_code(contract_fee_manager());
    let cw20_code = app.store_code(contract_cw20());
    let channel_code = app.store_code(contract_channel());

    let deploy = |app: &mut App, chain: u32| -> (Addr, Addr, Addr) {
        let fee_manager = app
            .instantiate_contract(
                fee_manager_code,
                admin.clone(),
                &fee_manager::msg::InstantiateMsg {
                    admin: None,
                    tiers: None,
                    split: None,
                },
                &[],
                "fee-manager",
                Some(admin.to_string()),
            )
            .unwrap();
        let channel = app
            .instantiate_contract(
                channel_code,
                admin.clone(),
                &mock_channel::InstantiateMsg {
                    chain,
                    fee_denom: FEE_DENOM.to_string(),
                },
                &[],
                "channel",
                None,
            )
            .unwrap();
        let station = app
            .instantiate_contract(
                station_code,
                admin.clone(),
                &InstantiateMsg {
                    admin: None,
                    this_chain: chain,
                    channel: channel.to_string(),
                    fee_manager: fee_manager.to_string(),
                    fee_denom: FEE_DENOM.to_string(),
                    alt_fee_token: None,
                    protocol_fee_recipient: protocol.to_string(),
                    relayer_fee_recipient: relayer.to_string(),
                },
                &[],
                "station",
                Some(admin.to_string()),
            )
            .unwrap();
        (fee_manager, channel, station)
    };

    let (fee_manager_a, channel_a, station_a) = deploy(&mut app, CHAIN_A);
    let (fee_manager_b, channel_b, station_b) = deploy(&mut app, CHAIN_B);

    let token_a = instantiate_token(
        &mut app,
        cw20_code,
        &admin,
        "USDC",
        6,
        vec![Cw20Coin {
            address: user.to_string(),
            amount: Uint128::new(USER_BALANCE),
        }],
        None,
    );
    let token_b = instantiate_token(&mut app, cw20_code, &admin, "USDCS", 6, vec![], Some(&station_b));

    let mut env = TestEnv {
        app,
        admin,
        user,
        protocol,
        relayer,
        cw20_code,
        a: Chain {
            id: CHAIN_A,
            channel: channel_a,
            station: station_a,
            fee_manager: fee_manager_a,
            token: token_a.clone(),
        },
        b: Chain {
            id: CHAIN_B,
            channel: channel_b,
            station: station_b,
            fee_manager: fee_manager_b,
            token: token_b.clone(),
        },
    };

    env.register_pair(&token_a, &token_b).unwrap();
    env.set_peers();
    env
}

pub fn instantiate_token(
    app: &mut App,
    code_id: u64,
    admin: &Addr,
    symbol: &str,
    decimals: u8,
    initial_balances: Vec<Cw20Coin>,
    minter: Option<&Addr>,
) -> Addr {
    app.instantiate_contract(
        code_id,
        admin.clone(),
        &cw20_base::msg::InstantiateMsg {
            name: format!("{} Token", symbol),
            symbol: symbol.to_string(),
            decimals,
            initial_balances,
            mint: minter.map(|m| MinterResponse {
                minter: m.to_string(),
                cap: None,
            }),
            marketing: None,
        },
        &[],
        symbol,
        None,
    )
    .unwrap()
}

impl TestEnv {
    pub fn chain(&self, side: Side) -> &Chain {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Register `token_a` (origin, locked on A) against `token_b` (wrapped, minted on B)
    pub fn register_pair(&mut self, token_a: &Addr, token_b: &Addr) -> Result<(), String> {
        let admin = self.admin.clone();
        let (station_a, station_b) = (self.a.station.clone(), self.b.station.clone());
        self.execute(
            &admin,
            &station_a,
            &ExecuteMsg::RegisterToken {
                remote_chain: CHAIN_B,
                remote_token: token_b.to_string(),
                local_token: token_a.to_string(),
                is_native: true,
                overwrite: false,
            },
        )?;
        self.execute(
            &admin,
            &station_b,
            &ExecuteMsg::RegisterToken {
                remote_chain: CHAIN_A,
                remote_token: token_a.to_string(),
                local_token: token_b.to_string(),
                is_native: false,
                overwrite: false,
            },
        )?;
        Ok(())
    }

    pub fn set_peers(&mut self) {
        let admin = self.admin.clone();
        let (station_a, station_b) = (self.a.station.clone(), self.b.station.clone());
        self.execute(
            &admin,
            &station_a,
            &ExecuteMsg::SetPeer {
                chain: CHAIN_B,
                peer: station_b.to_string(),
            },
        )
        .unwrap();
        self.execute(
            &admin,
            &station_b,
            &ExecuteMsg::SetPeer {
                chain: CHAIN_A,
                peer: station_a.to_string(),
            },
        )
        .unwrap();
    }

    /// Execute on `contract` without funds; errors come back as root-cause strings
    pub fn execute(
        &mut self,
        sender: &Addr,
        contract: &Addr,
        msg: &ExecuteMsg,
    ) -> Result<AppResponse, String> {
        self.app
            .execute_contract(sender.clone(), contract.clone(), msg, &[])
            .map_err(|e| e.root_cause().to_string())
    }

    pub fn request(&self, side: Side, token: &Addr, amount: u128, recipient: &str) -> TransferRequest {
        TransferRequest {
            token: token.to_string(),
            recipient: recipient.to_string(),
            amount: Uint128::new(amount),
            dest_chain: self.chain(side.other()).id,
        }
    }

    pub fn quote(
        &self,
        side: Side,
        sender: &Addr,
        request: &TransferRequest,
    ) -> StdResult<QuoteResponse> {
        self.app.wrap().query_wasm_smart(
            &self.chain(side).station,
            &QueryMsg::Quote {
                sender: sender.to_string(),
                request: request.clone(),
                options: Binary::default(),
                pay_in_alt_asset: false,
            },
        )
    }

    pub fn approve(&mut self, owner: &Addr, token: &Addr, spender: &Addr, amount: u128) {
        self.app
            .execute_contract(
                owner.clone(),
                token.clone(),
                &Cw20ExecuteMsg::IncreaseAllowance {
                    spender: spender.to_string(),
                    amount: Uint128::new(amount),
                    expires: None,
                },
                &[],
            )
            .unwrap();
    }

    /// Quote, approve exactly the transfer amount and bridge with the quoted fee
    pub fn bridge(
        &mut self,
        side: Side,
        sender: &Addr,
        token: &Addr,
        amount: u128,
        recipient: &str,
    ) -> Result<AppResponse, String> {
        let request = self.request(side, token, amount, recipient);
        let quote = self
            .quote(side, sender, &request)
            .map_err(|e| e.to_string())?;
        let station = self.chain(side).station.clone();
        self.approve(sender, token, &station, quote.transfer_amount.u128());
        self.bridge_with(side, sender, request, quote.native_fee.u128())
    }

    /// Bridge without approving anything first
    pub fn bridge_with(
        &mut self,
        side: Side,
        sender: &Addr,
        request: TransferRequest,
        native_fee: u128,
    ) -> Result<AppResponse, String> {
        let station = self.chain(side).station.clone();
        let funds = if native_fee == 0 {
            vec![]
        } else {
            coins(native_fee, FEE_DENOM)
        };
        self.app
            .execute_contract(
                sender.clone(),
                station,
                &ExecuteMsg::Bridge {
                    request,
                    options: Binary::default(),
                    pay_in_alt_asset: false,
                },
                &funds,
            )
            .map_err(|e| e.root_cause().to_string())
    }

    pub fn outbox(&self, side: Side) -> Vec<mock_channel::Packet> {
        self.app
            .wrap()
            .query_wasm_smart(&self.chain(side).channel, &mock_channel::QueryMsg::Outbox {})
            .unwrap()
    }

    /// Deliver the most recent packet sent from `from` to the opposite station
    pub fn relay_last(&mut self, from: Side) -> Result<AppResponse, String> {
        let packet = self
            .outbox(from)
            .pop()
            .ok_or_else(|| "outbox empty".to_string())?;
        self.deliver_packet(&packet)
    }

    pub fn deliver_packet(&mut self, packet: &mock_channel::Packet) -> Result<AppResponse, String> {
        let to = if packet.dest_chain == CHAIN_A {
            Side::A
        } else {
            Side::B
        };
        self.deliver(to, packet.src_chain, &packet.sender, packet.nonce, packet.payload.clone())
    }

    /// Have the channel on `to` deliver an arbitrary message to its station
    pub fn deliver(
        &mut self,
        to: Side,
        src_chain: u32,
        sender: &str,
        nonce: u64,
        payload: Binary,
    ) -> Result<AppResponse, String> {
        let chain = self.chain(to);
        let (channel, station) = (chain.channel.clone(), chain.station.clone());
        self.app
            .execute_contract(
                Addr::unchecked("terra1relayerbot"),
                channel,
                &mock_channel::ExecuteMsg::Deliver {
                    station: station.to_string(),
                    src_chain,
                    sender: sender.to_string(),
                    nonce,
                    payload,
                },
                &[],
            )
            .map_err(|e| e.root_cause().to_string())
    }

    pub fn balance(&self, token: &Addr, address: &Addr) -> u128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token,
                &Cw20QueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        res.balance.u128()
    }

    pub fn locked(&self, side: Side, token: &Addr) -> u128 {
        let res: LockedBalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.chain(side).station,
                &QueryMsg::LockedBalance {
                    token: token.to_string(),
                },
            )
            .unwrap();
        res.locked.u128()
    }

    pub fn query<T: serde::de::DeserializeOwned>(&self, side: Side, msg: &QueryMsg) -> T {
        self.app
            .wrap()
            .query_wasm_smart(&self.chain(side).station, msg)
            .unwrap()
    }
}
