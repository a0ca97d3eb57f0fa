// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Tests for Questrade API response parsing: no live connection needed.

#[cfg(feature = "questrade")]
mod questrade_tests {
    use qtbalance::{Price, SharePrice, Side, Symbol};
    use qtbalance_broker::questrade::auth::Session;
    use qtbalance_broker::questrade::types::{
        AccountsResponse, BalancesResponse, OrderRequest, OrderResponse, PositionsResponse,
        QuotesResponse, SymbolSearchResponse, TokenResponse,
    };
    use qtbalance_broker::{
        Account, AccountNumber, Balance, BrokerOrder, BrokerOrderType, Position, Quote, SymbolId,
        SymbolMatch,
    };

    // ========================================================================
    // Token response
    // ========================================================================

    #[test]
    fn parse_token_response() {
        let json = r#"{
            "access_token": "C3lTUKuNQrAAmSD/TPjuV/HI7aNrAwDp",
            "token_type": "Bearer",
            "expires_in": 1800,
            "refresh_token": "aSBe7wAAdx88QTbwut0tiu3SYic3ox8F",
            "api_server": "https://api01.iq.questrade.com/"
        }"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        let session = Session::from_response(resp, chrono::Utc::now());
        assert_eq!(session.api_server(), "https://api01.iq.questrade.com");
        assert_eq!(session.refresh_token(), "aSBe7wAAdx88QTbwut0tiu3SYic3ox8F");
        assert_eq!(
            session.authorization().as_str(),
            "Bearer C3lTUKuNQrAAmSD/TPjuV/HI7aNrAwDp"
        );
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    #[test]
    fn parse_accounts() {
        let json = r#"{
            "accounts": [
                {
                    "type": "TFSA",
                    "number": "26598145",
                    "status": "Active",
                    "isPrimary": true,
                    "isBilling": true,
                    "clientAccountType": "Individual"
                }
            ],
            "userId": 3000124
        }"#;
        let resp: AccountsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user_id, Some(3000124));

        let accounts: Vec<Account> = resp.accounts.into_iter().map(Account::from).collect();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].number, AccountNumber("26598145".into()));
        assert_eq!(accounts[0].account_type, "TFSA");
        assert!(accounts[0].is_primary);
    }

    #[test]
    fn parse_accounts_minimal() {
        let json = r#"{"accounts": [{"type": "Margin", "number": "1"}]}"#;
        let resp: AccountsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.accounts[0].status, "");
        assert!(!resp.accounts[0].is_primary);
    }

    // ========================================================================
    // Positions
    // ========================================================================

    #[test]
    fn parse_positions() {
        let json = r#"{
            "positions": [
                {
                    "symbol": "THI.TO",
                    "symbolId": 38738,
                    "openQuantity": 100,
                    "closedQuantity": 0,
                    "currentMarketValue": 6017,
                    "currentPrice": 60.17,
                    "averageEntryPrice": 60.23,
                    "closedPnl": 0,
                    "openPnl": -6,
                    "totalCost": false,
                    "isRealTime": "Individual",
                    "isUnderReorg": false
                }
            ]
        }"#;
        let resp: PositionsResponse = serde_json::from_str(json).unwrap();
        let pos = Position::try_from(resp.positions.into_iter().next().unwrap()).unwrap();

        assert_eq!(pos.symbol, Symbol::new("THI.TO"));
        assert_eq!(pos.symbol_id, SymbolId(38738));
        assert_eq!(pos.quantity, 100);
        assert_eq!(pos.current_price, SharePrice::from(Price(60_17)));
        assert_eq!(pos.market_value, Price(6017_00));
        assert_eq!(pos.open_pnl, Price(-6_00));
    }

    #[test]
    fn null_values_count_as_zero() {
        let json = r#"{
            "positions": [
                {
                    "symbol": "XAW.TO",
                    "symbolId": 1,
                    "openQuantity": 0,
                    "currentMarketValue": null,
                    "currentPrice": 30.5,
                    "openPnl": null
                }
            ]
        }"#;
        let resp: PositionsResponse = serde_json::from_str(json).unwrap();
        let pos = Position::try_from(resp.positions.into_iter().next().unwrap()).unwrap();
        assert_eq!(pos.market_value, Price::ZERO);
        assert_eq!(pos.open_pnl, Price::ZERO);
    }

    #[test]
    fn empty_symbol_rejected() {
        let json = r#"{"positions": [{"symbol": "", "symbolId": 1, "openQuantity": 1}]}"#;
        let resp: PositionsResponse = serde_json::from_str(json).unwrap();
        assert!(Position::try_from(resp.positions.into_iter().next().unwrap()).is_err());
    }

    // ========================================================================
    // Balances
    // ========================================================================

    #[test]
    fn parse_balances() {
        let json = r#"{
            "perCurrencyBalances": [
                {
                    "currency": "CAD",
                    "cash": 243971.7,
                    "marketValue": 6017,
                    "totalEquity": 249988.7,
                    "buyingPower": 496367.2,
                    "maintenanceExcess": 248183.6,
                    "isRealTime": false
                },
                {
                    "currency": "USD",
                    "cash": 198259.05,
                    "marketValue": 53745,
                    "totalEquity": 252004.05,
                    "buyingPower": 461959.41,
                    "maintenanceExcess": 230979.7,
                    "isRealTime": false
                }
            ],
            "combinedBalances": [],
            "sodPerCurrencyBalances": [],
            "sodCombinedBalances": []
        }"#;
        let resp: BalancesResponse = serde_json::from_str(json).unwrap();
        let balances: Vec<Balance> = resp
            .per_currency_balances
            .into_iter()
            .map(|b| Balance::try_from(b).unwrap())
            .collect();

        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].currency, "CAD");
        assert_eq!(balances[0].buying_power, Price(496367_20));
        assert_eq!(balances[1].cash, Price(198259_05));
    }

    // ========================================================================
    // Symbol search and quotes
    // ========================================================================

    #[test]
    fn parse_symbol_search() {
        let json = r#"{
            "symbols": [
                {
                    "symbol": "VFV.TO",
                    "symbolId": 8049,
                    "description": "VANGUARD S&P 500 INDEX ETF",
                    "securityType": "Stock",
                    "listingExchange": "TSX",
                    "isTradable": true,
                    "isQuotable": true,
                    "currency": "CAD"
                }
            ]
        }"#;
        let resp: SymbolSearchResponse = serde_json::from_str(json).unwrap();
        let found = SymbolMatch::try_from(resp.symbols.into_iter().next().unwrap()).unwrap();
        assert_eq!(found.symbol.as_str(), "VFV.TO");
        assert_eq!(found.symbol_id, SymbolId(8049));
        assert_eq!(found.listing_exchange, "TSX");
    }

    #[test]
    fn parse_quote() {
        let json = r#"{
            "quotes": [
                {
                    "symbol": "VFV.TO",
                    "symbolId": 8049,
                    "tier": "",
                    "bidPrice": 101.45,
                    "bidSize": 300,
                    "askPrice": 101.5,
                    "askSize": 200,
                    "lastTradePrice": 101.47,
                    "volume": 125880,
                    "isHalted": false
                }
            ]
        }"#;
        let resp: QuotesResponse = serde_json::from_str(json).unwrap();
        let quote = Quote::try_from(resp.quotes.into_iter().next().unwrap()).unwrap();
        assert_eq!(quote.bid, Some(SharePrice::from(Price(101_45))));
        assert_eq!(quote.ask, Some(SharePrice::from(Price(101_50))));
        assert_eq!(quote.reference_price(), Some(SharePrice::from(Price(101_45))));
        assert_eq!(quote.volume, 125880);
    }

    #[test]
    fn parse_quote_market_closed() {
        let json = r#"{
            "quotes": [
                {
                    "symbol": "VFV.TO",
                    "symbolId": 8049,
                    "bidPrice": null,
                    "askPrice": null,
                    "lastTradePrice": 101.47
                }
            ]
        }"#;
        let resp: QuotesResponse = serde_json::from_str(json).unwrap();
        let quote = Quote::try_from(resp.quotes.into_iter().next().unwrap()).unwrap();
        assert_eq!(quote.bid, None);
        assert_eq!(quote.reference_price(), Some(SharePrice::from(Price(101_47))));
    }

    #[test]
    fn parse_quote_sub_cent() {
        let json = r#"{
            "quotes": [
                {
                    "symbol": "PNNY.V",
                    "symbolId": 9120,
                    "bidPrice": 0.004,
                    "askPrice": 0.455,
                    "lastTradePrice": 0.0045
                }
            ]
        }"#;
        let resp: QuotesResponse = serde_json::from_str(json).unwrap();
        let quote = Quote::try_from(resp.quotes.into_iter().next().unwrap()).unwrap();
        assert_eq!(quote.reference_price(), Some(SharePrice(4_000)));
        assert_eq!(quote.ask, Some(SharePrice(455_000)));
        assert_eq!(quote.last, Some(SharePrice(4_500)));
    }

    // ========================================================================
    // Orders
    // ========================================================================

    #[test]
    fn serialize_market_order() {
        let order = BrokerOrder {
            symbol: Symbol::new("VFV.TO"),
            symbol_id: SymbolId(8049),
            side: Side::Buy,
            quantity: 10,
            order_type: BrokerOrderType::Market,
        };
        let req = OrderRequest::new(&AccountNumber("26598145".into()), &order);
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["accountNumber"], "26598145");
        assert_eq!(value["symbolId"], 8049);
        assert_eq!(value["quantity"], 10);
        assert_eq!(value["orderType"], "Market");
        assert_eq!(value["action"], "Buy");
        assert_eq!(value["timeInForce"], "Day");
        assert!(value.get("limitPrice").is_none());
    }

    #[test]
    fn serialize_limit_sell() {
        let order = BrokerOrder {
            symbol: Symbol::new("VFV.TO"),
            symbol_id: SymbolId(8049),
            side: Side::Sell,
            quantity: 3,
            order_type: BrokerOrderType::Limit(SharePrice::from(Price(101_50))),
        };
        let req = OrderRequest::new(&AccountNumber("1".into()), &order);
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["orderType"], "Limit");
        assert_eq!(value["action"], "Sell");
        assert_eq!(value["limitPrice"], 101.5);
    }

    #[test]
    fn parse_order_response() {
        let json = r#"{
            "orderId": 177106005,
            "orders": [
                { "id": 177106005, "symbol": "VFV.TO", "state": "Pending" }
            ]
        }"#;
        let resp: OrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.placed_id(), Some(177106005));

        let only_orders = r#"{"orders": [{"id": 42, "symbol": "VFV.TO"}]}"#;
        let resp: OrderResponse = serde_json::from_str(only_orders).unwrap();
        assert_eq!(resp.placed_id(), Some(42));
    }
}
