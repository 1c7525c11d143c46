//! Solidity interfaces of the deployed trust protocol.
//!
//! Only the functions and events the actions use are declared.

use alloy::sol;

sol! {
    /// Trust score reader.
    interface ITrustProtocol {
        function getProviderInfo(address provider)
            external
            view
            returns (uint256 score, uint8 tier, uint256 timeout, bool isActive);

        function getTrustTier(address provider) external view returns (string memory);

        function needsEscrow(address provider) external view returns (bool);

        function compareProviders(address[] calldata providers)
            external
            view
            returns (uint256[] memory scores, uint256[] memory timeouts);
    }

    /// Escrow vault holding payments until delivery or dispute.
    interface IEscrowVault {
        #[derive(Debug, PartialEq, Eq)]
        struct DeliveryProof {
            bytes32 requestHash;
            bytes32 responseHash;
            uint256 responseSize;
            bytes32 schemaHash;
            bytes signature;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct Payment {
            address buyer;
            address provider;
            uint256 amount;
            bytes32 requestHash;
            uint256 createdAt;
            uint256 timeout;
            uint256 deliveryBlock;
            uint8 status;
            bool useEscrow;
        }

        #[derive(Debug, PartialEq, Eq)]
        event PaymentCreated(
            bytes32 indexed paymentId,
            address indexed buyer,
            address indexed provider,
            uint256 amount,
            bool useEscrow,
            uint256 timeout
        );

        #[derive(Debug, PartialEq, Eq)]
        event DisputeRaised(bytes32 indexed paymentId, bytes32 indexed disputeId);

        function createPayment(address provider, uint256 amount, bytes32 requestHash)
            external
            returns (bytes32 paymentId);

        function confirmDelivery(bytes32 paymentId, DeliveryProof calldata proof) external;

        function raiseDispute(bytes32 paymentId, bytes32 evidence) external returns (bytes32 disputeId);

        function getPayment(bytes32 paymentId) external view returns (Payment memory);
    }

    /// Payment token (6 decimals).
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);

        function allowance(address owner, address spender) external view returns (uint256);

        function balanceOf(address account) external view returns (uint256);
    }
}
