//! Protobuf messages of Cosmos SDK transactions.
//!
//! Only the fields transfers use are declared; field tags match the SDK
//! definitions so the encodings are byte-identical.

use prost::Message;

/// Type URL of `cosmos.bank.v1beta1.MsgSend`.
pub const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";

/// Type URL of `cosmwasm.wasm.v1.MsgExecuteContract`.
pub const MSG_EXECUTE_CONTRACT_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";

/// Type URL of secp256k1 public keys.
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Type URL of Ethereum-style secp256k1 public keys.
pub const ETH_SECP256K1_PUBKEY_TYPE_URL: &str = "/ethermint.crypto.v1.ethsecp256k1.PubKey";

/// `SIGN_MODE_DIRECT`.
pub const SIGN_MODE_DIRECT: i32 = 1;

/// `cosmos.base.v1beta1.Coin`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Coin {
    /// Denomination.
    #[prost(string, tag = "1")]
    pub denom: String,
    /// Decimal integer amount.
    #[prost(string, tag = "2")]
    pub amount: String,
}

/// `google.protobuf.Any`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Any {
    /// Message type URL.
    #[prost(string, tag = "1")]
    pub type_url: String,
    /// Encoded message.
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

impl Any {
    /// Packs a message under `type_url`.
    pub fn pack<M: Message>(type_url: &str, message: &M) -> Self {
        Self {
            type_url: type_url.to_string(),
            value: message.encode_to_vec(),
        }
    }
}

/// `cosmos.bank.v1beta1.MsgSend`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct MsgSend {
    /// Sender.
    #[prost(string, tag = "1")]
    pub from_address: String,
    /// Recipient.
    #[prost(string, tag = "2")]
    pub to_address: String,
    /// Coins sent.
    #[prost(message, repeated, tag = "3")]
    pub amount: Vec<Coin>,
}

/// `cosmwasm.wasm.v1.MsgExecuteContract`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct MsgExecuteContract {
    /// Caller.
    #[prost(string, tag = "1")]
    pub sender: String,
    /// Contract address.
    #[prost(string, tag = "2")]
    pub contract: String,
    /// JSON call message.
    #[prost(bytes = "vec", tag = "3")]
    pub msg: Vec<u8>,
    /// Coins attached to the call.
    #[prost(message, repeated, tag = "5")]
    pub funds: Vec<Coin>,
}

/// `cosmos.tx.v1beta1.TxBody`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct TxBody {
    /// Messages in execution order.
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    /// Free-form memo.
    #[prost(string, tag = "2")]
    pub memo: String,
    /// Height after which the transaction is invalid; zero disables it.
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

/// `cosmos.tx.v1beta1.ModeInfo.Single`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Single {
    /// Sign mode.
    #[prost(int32, tag = "1")]
    pub mode: i32,
}

/// `cosmos.tx.v1beta1.ModeInfo` restricted to the single-signer case.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct ModeInfo {
    /// Single-signer mode.
    #[prost(message, optional, tag = "1")]
    pub single: Option<Single>,
}

/// `cosmos.tx.v1beta1.SignerInfo`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct SignerInfo {
    /// Signer public key.
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    /// Sign mode.
    #[prost(message, optional, tag = "2")]
    pub mode_info: Option<ModeInfo>,
    /// Account sequence.
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

/// `cosmos.tx.v1beta1.Fee`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Fee {
    /// Fee coins, sorted by denomination.
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    /// Gas limit.
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    /// Fee payer, when not the first signer.
    #[prost(string, tag = "3")]
    pub payer: String,
    /// Fee granter.
    #[prost(string, tag = "4")]
    pub granter: String,
}

/// `cosmos.tx.v1beta1.AuthInfo`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct AuthInfo {
    /// One entry per signer.
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    /// Fee.
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

/// `cosmos.tx.v1beta1.SignDoc`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct SignDoc {
    /// Encoded `TxBody`.
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    /// Encoded `AuthInfo`.
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    /// Chain id.
    #[prost(string, tag = "3")]
    pub chain_id: String,
    /// Signer account number.
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
}

/// `cosmos.tx.v1beta1.TxRaw`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct TxRaw {
    /// Encoded `TxBody`.
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    /// Encoded `AuthInfo`.
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    /// Signatures in signer order.
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

/// `cosmos.crypto.secp256k1.PubKey` and its Ethereum-style twin.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct PubKey {
    /// Compressed SEC1 key.
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}
